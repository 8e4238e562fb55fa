use tracing::{error, info, warn};

use crate::api::{ApiError, AuthApi};
use crate::auth::Session;
use crate::models::{LoginRequest, LoginResponse};
use crate::notify::Toaster;
use crate::routes::Route;

use super::{check_email, SubmitState, Submission, ValidationError};

/// What a login attempt ended in
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// A request was already in flight, nothing was sent
    Ignored,
    Invalid(ValidationError),
    /// Session established; the token is also stored durably
    LoggedIn { token: String },
    /// The backend answered without a token. Nothing is shown and nothing changes.
    MissingToken,
    Failed(String),
}

impl LoginOutcome {
    pub fn navigate_to(&self) -> Option<Route> {
        match self {
            LoginOutcome::LoggedIn { .. } => Some(Route::Dashboard),
            _ => None,
        }
    }
}

/// Login page form state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    state: SubmitState,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_email(&self.email)
    }

    /// Validate and move to `Submitting`, returning the request to send
    pub fn begin_submit(&mut self) -> Submission<LoginRequest> {
        if self.state.is_submitting() {
            return Submission::Ignored;
        }

        if let Err(e) = self.validate() {
            self.state = SubmitState::Error(e.to_string());
            return Submission::Invalid(e);
        }

        self.state = SubmitState::Submitting;
        Submission::Send(LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Apply the login response to the session and settle the form
    pub fn settle(
        &mut self,
        result: Result<LoginResponse, ApiError>,
        session: &Session,
        toaster: &Toaster,
    ) -> LoginOutcome {
        match result {
            Ok(LoginResponse {
                token: Some(token),
                user,
            }) => {
                if let Err(e) = session.establish(&token, user) {
                    warn!(error = %e, "Failed to persist session token");
                }
                toaster.success("Login successful!");
                self.password.clear();
                self.state = SubmitState::Success;
                info!("Login successful");
                LoginOutcome::LoggedIn { token }
            }
            Ok(LoginResponse { token: None, .. }) => {
                warn!("Login response did not include a token");
                self.state = SubmitState::Idle;
                LoginOutcome::MissingToken
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let message = e.user_message();
                self.state = SubmitState::Error(message.clone());
                LoginOutcome::Failed(message)
            }
        }
    }

    /// Run a whole submission against `api`
    pub async fn submit<A: AuthApi>(
        &mut self,
        api: &A,
        session: &Session,
        toaster: &Toaster,
    ) -> LoginOutcome {
        let request = match self.begin_submit() {
            Submission::Send(request) => request,
            Submission::Ignored => return LoginOutcome::Ignored,
            Submission::Invalid(e) => return LoginOutcome::Invalid(e),
        };

        let result = api.login(&request).await;
        self.settle(result, session, toaster)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::Utc;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::auth::{FileTokenStore, SessionContext};
    use crate::flow::testing::FakeApi;
    use crate::models::User;
    use crate::notify::ToastHost;

    struct Harness {
        _dir: tempfile::TempDir,
        session: Session,
        host: ToastHost,
        toaster: Toaster,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::new(
            Box::new(FileTokenStore::new(dir.path())),
            SessionContext::new(),
        );
        let (host, toaster) = ToastHost::new();
        Harness {
            _dir: dir,
            session,
            host,
            toaster,
        }
    }

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            ..LoginForm::default()
        }
    }

    #[tokio::test]
    async fn test_empty_email_sends_nothing() {
        let h = harness();
        let api = FakeApi::default();
        let mut login = form("", "secret");

        let outcome = login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(outcome, LoginOutcome::Invalid(ValidationError::MissingEmail));
        assert_eq!(login.error(), Some("Please enter a valid email."));
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_email_keeps_existing_message() {
        let h = harness();
        let api = FakeApi::default();
        let mut login = form("john", "secret");

        let outcome = login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(outcome, LoginOutcome::Invalid(ValidationError::MalformedEmail));
        assert_eq!(login.error(), Some("Please enter your password."));
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_email_sends_one_request_with_both_fields() {
        let h = harness();
        let api = FakeApi::default();
        let mut login = form("a@b.com", "");

        login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(api.login_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            api.last_login.lock().unwrap().clone(),
            Some(LoginRequest {
                email: "a@b.com".to_string(),
                password: String::new(),
            })
        );
    }

    #[tokio::test]
    async fn test_successful_login_establishes_session() {
        let mut h = harness();
        let user = json!({"id": 1, "fullName": "John Doe", "email": "a@b.com"});
        let api = FakeApi::login_replies(Ok(LoginResponse {
            token: Some("abc".to_string()),
            user: Some(User::new(user.clone())),
        }));
        let mut login = form("a@b.com", "secret");

        let outcome = login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(outcome, LoginOutcome::LoggedIn { token: "abc".to_string() });
        assert_eq!(outcome.navigate_to(), Some(Route::Dashboard));
        assert_eq!(h.session.stored_token().expect("load").as_deref(), Some("abc"));
        assert_eq!(h.session.context().user(), Some(User::new(user)));
        assert_eq!(login.state(), &SubmitState::Success);
        assert!(login.password.is_empty());

        h.host.poll(Utc::now());
        assert_eq!(h.host.visible().len(), 1);
        assert_eq!(h.host.visible()[0].message, "Login successful!");
    }

    #[tokio::test]
    async fn test_missing_token_is_silent() {
        let mut h = harness();
        let api = FakeApi::login_replies(Ok(LoginResponse {
            token: None,
            user: Some(User::new(json!({"id": 1}))),
        }));
        let mut login = form("a@b.com", "secret");

        let outcome = login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(outcome, LoginOutcome::MissingToken);
        assert_eq!(outcome.navigate_to(), None);
        assert_eq!(login.error(), None);
        assert_eq!(login.state(), &SubmitState::Idle);
        assert_eq!(h.session.stored_token().expect("load"), None);
        assert!(!h.session.context().has_user());

        h.host.poll(Utc::now());
        assert!(h.host.visible().is_empty());
    }

    #[tokio::test]
    async fn test_backend_message_is_shown_verbatim() {
        let h = harness();
        let api = FakeApi::login_replies(Err(ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Account is not active"}"#,
        )));
        let mut login = form("a@b.com", "secret");

        let outcome = login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(outcome, LoginOutcome::Failed("Account is not active".to_string()));
        assert_eq!(outcome.navigate_to(), None);
        assert_eq!(login.error(), Some("Account is not active"));
        assert_eq!(login.password, "secret");
    }

    #[tokio::test]
    async fn test_error_without_message_uses_transport_text() {
        let h = harness();
        let api = FakeApi::login_replies(Err(ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "",
        )));
        let mut login = form("a@b.com", "secret");

        login.submit(&api, &h.session, &h.toaster).await;

        assert_eq!(login.error(), Some("Request failed with status code 500"));
    }

    #[test]
    fn test_second_submit_is_ignored_while_submitting() {
        let mut login = form("a@b.com", "secret");

        assert!(matches!(login.begin_submit(), Submission::Send(_)));
        assert!(login.is_submitting());
        assert_eq!(login.begin_submit(), Submission::Ignored);
        assert!(login.is_submitting());
    }

    #[test]
    fn test_new_attempt_clears_previous_error() {
        let mut login = form("", "secret");
        login.begin_submit();
        assert!(login.error().is_some());

        login.email = "a@b.com".to_string();
        assert!(matches!(login.begin_submit(), Submission::Send(_)));
        assert_eq!(login.error(), None);
    }

    #[test]
    fn test_with_email_prefills() {
        let login = LoginForm::with_email("a@b.com");
        assert_eq!(login.email, "a@b.com");
        assert!(login.password.is_empty());
        assert_eq!(login.state(), &SubmitState::Idle);
    }
}
