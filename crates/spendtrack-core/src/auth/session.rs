use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::models::User;

use super::TokenStore;

/// Shared current-user state.
///
/// Cloned handles all refer to the same value. Writers call `set_user`;
/// readers either take a snapshot with `user` or `subscribe` to be woken on
/// every change. Last write wins.
#[derive(Clone, Debug)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Option<User>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Publish a new current user (or None when signed out)
    pub fn set_user(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn has_user(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted token plus the in-memory user it belongs to
pub struct Session {
    store: Box<dyn TokenStore>,
    context: SessionContext,
}

impl Session {
    pub fn new(store: Box<dyn TokenStore>, context: SessionContext) -> Self {
        Self { store, context }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Token left behind by a previous login, if any
    pub fn stored_token(&self) -> Result<Option<String>> {
        self.store.load()
    }

    /// Record a successful login.
    ///
    /// The user is published even if persisting the token fails; the storage
    /// error is returned so the caller can report it.
    pub fn establish(&self, token: &str, user: Option<User>) -> Result<()> {
        let saved = self.store.save(token);
        self.context.set_user(user);
        debug!(persisted = saved.is_ok(), "Session established");
        saved
    }

    /// Forget the token and the current user
    pub fn sign_out(&self) -> Result<()> {
        self.context.set_user(None);
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FileTokenStore;
    use serde_json::json;

    fn session(dir: &std::path::Path) -> Session {
        Session::new(Box::new(FileTokenStore::new(dir)), SessionContext::new())
    }

    #[test]
    fn test_context_handles_share_state() {
        let ctx = SessionContext::new();
        let other = ctx.clone();
        assert!(!other.has_user());

        ctx.set_user(Some(User::new(json!({"id": 1}))));
        assert_eq!(other.user(), Some(User::new(json!({"id": 1}))));
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let ctx = SessionContext::new();
        let mut rx = ctx.subscribe();

        ctx.set_user(Some(User::new(json!({"fullName": "Jane"}))));
        rx.changed().await.expect("sender alive");
        assert_eq!(
            rx.borrow_and_update().as_ref().and_then(|u| u.full_name().map(String::from)),
            Some("Jane".to_string())
        );

        ctx.set_user(None);
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_establish_and_sign_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session(dir.path());

        session
            .establish("abc", Some(User::new(json!({"id": 9}))))
            .expect("establish");
        assert_eq!(session.stored_token().expect("load").as_deref(), Some("abc"));
        assert!(session.context().has_user());

        session.establish("def", None).expect("establish");
        assert_eq!(session.stored_token().expect("load").as_deref(), Some("def"));

        session.sign_out().expect("sign out");
        assert_eq!(session.stored_token().expect("load"), None);
        assert!(!session.context().has_user());
    }
}
