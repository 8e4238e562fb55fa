//! Authentication form flows.
//!
//! Each form moves through `SubmitState`: `Idle` → `Submitting` on a valid
//! submit, then settles in `Success` or `Error`. Submitting is split in two
//! so a caller can run the request elsewhere:
//!
//! 1. `begin_submit` validates and flips the form to `Submitting`, handing
//!    back the request to send (or why nothing should be sent)
//! 2. `settle` consumes the response and reports where to navigate
//!
//! `submit` does both around an `AuthApi` call.

use thiserror::Error;

pub mod login;
pub mod signup;

pub use login::{LoginForm, LoginOutcome};
pub use signup::{SignupForm, SignupOutcome};

/// Form submission state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    /// A request is in flight. The flow adds no timeout of its own; a hung
    /// request ends when the client's transport timeout fires, settling as
    /// `Error` with the timeout `ApiError::NetworkError` message.
    Submitting,
    Success,
    Error(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    /// Inline error text, if the last attempt failed
    pub fn error(&self) -> Option<&str> {
        match self {
            SubmitState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Local input problems, caught before any request is sent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your full name.")]
    MissingFullName,

    #[error("Please enter a valid email.")]
    MissingEmail,

    // Existing wording, kept for compatibility: it names the password although
    // the email failed the shape check.
    #[error("Please enter your password.")]
    MalformedEmail,
}

/// Result of starting a submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    /// Send this request, the form is now submitting
    Send(R),
    /// A request is already in flight for this form
    Ignored,
    /// Validation failed; the form shows the error
    Invalid(ValidationError),
}

/// Email checks shared by both forms: presence, then shape
fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !crate::utils::validate_email(email) {
        return Err(ValidationError::MalformedEmail);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted `AuthApi` for flow tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use crate::api::{ApiError, AuthApi};
    use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

    #[derive(Default)]
    pub struct FakeApi {
        pub login_calls: AtomicUsize,
        pub register_calls: AtomicUsize,
        pub last_login: Mutex<Option<LoginRequest>>,
        pub last_register: Mutex<Option<RegisterRequest>>,
        pub login_reply: Mutex<Option<Result<LoginResponse, ApiError>>>,
        pub register_reply: Mutex<Option<Result<StatusCode, ApiError>>>,
    }

    impl FakeApi {
        pub fn login_replies(reply: Result<LoginResponse, ApiError>) -> Self {
            let api = Self::default();
            *api.login_reply.lock().unwrap() = Some(reply);
            api
        }

        pub fn register_replies(reply: Result<StatusCode, ApiError>) -> Self {
            let api = Self::default();
            *api.register_reply.lock().unwrap() = Some(reply);
            api
        }
    }

    impl AuthApi for FakeApi {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_login.lock().unwrap() = Some(request.clone());
            self.login_reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(LoginResponse::default()))
        }

        async fn register(&self, request: &RegisterRequest) -> Result<StatusCode, ApiError> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_register.lock().unwrap() = Some(request.clone());
            self.register_reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(StatusCode::CREATED))
        }
    }
}
