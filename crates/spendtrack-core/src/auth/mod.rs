//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `TokenStore`: durable storage for the session token (file or OS keychain)
//! - `SessionContext`: the shared, subscribable current-user state
//! - `Session`: the pair of both, written together on login
//!
//! Tokens carry no expiry; whatever the backend returned is kept until the
//! next login overwrites it or the user logs out.

pub mod session;
pub mod token_store;

pub use session::{Session, SessionContext};
pub use token_store::{FileTokenStore, KeyringTokenStore, TokenStore, TOKEN_KEY};
