use reqwest::StatusCode;
use tracing::{error, info};

use crate::api::{ApiError, AuthApi};
use crate::models::RegisterRequest;
use crate::notify::Toaster;
use crate::routes::Route;

use super::{check_email, SubmitState, Submission, ValidationError};

/// What a signup attempt ended in
#[derive(Debug, Clone, PartialEq)]
pub enum SignupOutcome {
    Ignored,
    Invalid(ValidationError),
    Registered,
    Failed(String),
}

impl SignupOutcome {
    pub fn navigate_to(&self) -> Option<Route> {
        match self {
            SignupOutcome::Registered => Some(Route::Login),
            _ => None,
        }
    }
}

/// Signup page form state
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    state: SubmitState,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
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

    /// Full name first, then email presence, then email shape
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingFullName);
        }
        check_email(&self.email)
    }

    pub fn begin_submit(&mut self) -> Submission<RegisterRequest> {
        if self.state.is_submitting() {
            return Submission::Ignored;
        }

        if let Err(e) = self.validate() {
            self.state = SubmitState::Error(e.to_string());
            return Submission::Invalid(e);
        }

        self.state = SubmitState::Submitting;
        Submission::Send(RegisterRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Only 201 Created counts as a registration; any other answer is an error.
    pub fn settle(
        &mut self,
        result: Result<StatusCode, ApiError>,
        toaster: &Toaster,
    ) -> SignupOutcome {
        let result = result.and_then(|status| {
            if status == StatusCode::CREATED {
                Ok(status)
            } else {
                Err(ApiError::UnexpectedStatus(status))
            }
        });

        match result {
            Ok(_) => {
                toaster.success("Profile created successfully.");
                self.password.clear();
                self.state = SubmitState::Success;
                info!("Profile registered");
                SignupOutcome::Registered
            }
            Err(e) => {
                error!(error = %e, "Signup failed");
                let message = e.user_message();
                self.state = SubmitState::Error(message.clone());
                SignupOutcome::Failed(message)
            }
        }
    }

    pub async fn submit<A: AuthApi>(&mut self, api: &A, toaster: &Toaster) -> SignupOutcome {
        let request = match self.begin_submit() {
            Submission::Send(request) => request,
            Submission::Ignored => return SignupOutcome::Ignored,
            Submission::Invalid(e) => return SignupOutcome::Invalid(e),
        };

        let result = api.register(&request).await;
        self.settle(result, toaster)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::Utc;

    use super::*;
    use crate::flow::testing::FakeApi;
    use crate::notify::ToastHost;

    fn form(full_name: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..SignupForm::default()
        }
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(
            form("", "", "").validate(),
            Err(ValidationError::MissingFullName)
        );
        assert_eq!(
            form("  ", "bad", "").validate(),
            Err(ValidationError::MissingFullName)
        );
        assert_eq!(
            form("John", " ", "").validate(),
            Err(ValidationError::MissingEmail)
        );
        assert_eq!(
            form("John", "john@me", "").validate(),
            Err(ValidationError::MalformedEmail)
        );
        assert_eq!(form("John", "john@me.com", "").validate(), Ok(()));
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (_host, toaster) = ToastHost::new();
        let api = FakeApi::default();
        let mut signup = form("", "john@me.com", "secret");

        let outcome = signup.submit(&api, &toaster).await;

        assert_eq!(outcome, SignupOutcome::Invalid(ValidationError::MissingFullName));
        assert_eq!(signup.error(), Some("Please enter your full name."));
        assert_eq!(api.register_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_created_navigates_to_login() {
        let (mut host, toaster) = ToastHost::new();
        let api = FakeApi::register_replies(Ok(StatusCode::CREATED));
        let mut signup = form("John Doe", "john@me.com", "secret");

        let outcome = signup.submit(&api, &toaster).await;

        assert_eq!(outcome, SignupOutcome::Registered);
        assert_eq!(outcome.navigate_to(), Some(Route::Login));
        assert_eq!(signup.state(), &SubmitState::Success);
        assert_eq!(
            api.last_register.lock().unwrap().clone(),
            Some(RegisterRequest {
                full_name: "John Doe".to_string(),
                email: "john@me.com".to_string(),
                password: "secret".to_string(),
            })
        );

        host.poll(Utc::now());
        assert_eq!(host.visible()[0].message, "Profile created successfully.");
    }

    #[tokio::test]
    async fn test_other_success_status_is_an_error() {
        let (mut host, toaster) = ToastHost::new();
        let api = FakeApi::register_replies(Ok(StatusCode::OK));
        let mut signup = form("John Doe", "john@me.com", "secret");

        let outcome = signup.submit(&api, &toaster).await;

        assert_eq!(outcome.navigate_to(), None);
        assert_eq!(signup.error(), Some("Unexpected response status: 200"));

        host.poll(Utc::now());
        assert!(host.visible().is_empty());
    }

    #[tokio::test]
    async fn test_backend_rejection_shows_message() {
        let (_host, toaster) = ToastHost::new();
        let api = FakeApi::register_replies(Err(ApiError::from_status(
            StatusCode::CONFLICT,
            r#"{"message": "Email already registered"}"#,
        )));
        let mut signup = form("John Doe", "john@me.com", "secret");

        let outcome = signup.submit(&api, &toaster).await;

        assert_eq!(outcome, SignupOutcome::Failed("Email already registered".to_string()));
        assert_eq!(signup.error(), Some("Email already registered"));
    }

    #[test]
    fn test_second_submit_is_ignored_while_submitting() {
        let mut signup = form("John Doe", "john@me.com", "secret");
        assert!(matches!(signup.begin_submit(), Submission::Send(_)));
        assert_eq!(signup.begin_submit(), Submission::Ignored);
    }
}
