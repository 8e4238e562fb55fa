//! Application state management for spendtrack.
//!
//! This module contains the core `App` struct: the application shell that
//! owns the router, the toast host, the session and the two auth forms, and
//! coordinates the background auth requests.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use spendtrack_core::api::{ApiClient, ApiError};
use spendtrack_core::auth::{Session, SessionContext};
use spendtrack_core::config::Config;
use spendtrack_core::flow::{LoginForm, LoginOutcome, SignupForm, Submission};
use spendtrack_core::models::{LoginResponse, User};
use spendtrack_core::notify::{ToastHost, Toaster};
use spendtrack_core::routes::{Route, Router};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background auth result channel.
/// Each form has at most one request in flight, so two slots would do.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for email input (RFC 5321 path limit)
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

const MAX_FULL_NAME_LENGTH: usize = 100;

/// Env vars that prefill the login form
const EMAIL_ENV: &str = "SPENDTRACK_EMAIL";
const PASSWORD_ENV: &str = "SPENDTRACK_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
    SignupLink,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::SignupLink,
            LoginFocus::SignupLink => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::SignupLink,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
            LoginFocus::SignupLink => LoginFocus::Button,
        }
    }
}

/// Signup form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFocus {
    FullName,
    Email,
    Password,
    Button,
    LoginLink,
}

impl SignupFocus {
    pub fn next(&self) -> Self {
        match self {
            SignupFocus::FullName => SignupFocus::Email,
            SignupFocus::Email => SignupFocus::Password,
            SignupFocus::Password => SignupFocus::Button,
            SignupFocus::Button => SignupFocus::LoginLink,
            SignupFocus::LoginLink => SignupFocus::FullName,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SignupFocus::FullName => SignupFocus::LoginLink,
            SignupFocus::Email => SignupFocus::FullName,
            SignupFocus::Password => SignupFocus::Email,
            SignupFocus::Button => SignupFocus::Password,
            SignupFocus::LoginLink => SignupFocus::Button,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Responses from auth requests running on the runtime
enum AuthResult {
    Login(Result<LoginResponse, ApiError>),
    Signup(Result<StatusCode, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub session: Session,

    // Shell
    pub state: AppState,
    pub router: Router,
    pub toasts: ToastHost,
    toaster: Toaster,

    // Auth forms
    pub login: LoginForm,
    pub login_focus: LoginFocus,
    pub signup: SignupForm,
    pub signup_focus: SignupFocus,

    // Background task channel
    auth_rx: mpsc::Receiver<AuthResult>,
    auth_tx: mpsc::Sender<AuthResult>,

    // Status message
    pub status_message: Option<String>,

    /// Whether settings changes are written back to the config file
    persist_config: bool,
}

impl App {
    /// Create the application from loaded configuration.
    ///
    /// Fails if the endpoint configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let endpoints = config
            .endpoints()
            .context("Invalid API endpoint configuration")?;
        debug!(base_url = %endpoints.base_url(), "Endpoints configured");

        let api = ApiClient::new(endpoints)?;
        let session = Session::new(config.token_store()?, SessionContext::new());

        let mut app = Self::from_parts(config, api, session);
        app.persist_config = true;

        // Credentials from env vars take precedence over the remembered email
        if let Ok(email) = std::env::var(EMAIL_ENV) {
            app.login.email = email;
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            app.login.password = password;
        }
        if !app.login.email.is_empty() {
            app.login_focus = LoginFocus::Password;
        }

        Ok(app)
    }

    /// Assemble the shell around already-built services
    pub fn from_parts(config: Config, mut api: ApiClient, session: Session) -> Self {
        let stored_token = match session.stored_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        let initial_route = match stored_token {
            Some(token) => {
                api.set_token(token);
                Route::Dashboard
            }
            None => Route::Login,
        };
        debug!(route = initial_route.path(), "Initial route");

        let login = config
            .last_email
            .clone()
            .map(LoginForm::with_email)
            .unwrap_or_default();

        let (toasts, toaster) = ToastHost::new();
        let (auth_tx, auth_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            api,
            session,

            state: AppState::Normal,
            router: Router::new(initial_route),
            toasts,
            toaster,

            login,
            login_focus: LoginFocus::Email,
            signup: SignupForm::new(),
            signup_focus: SignupFocus::FullName,

            auth_rx,
            auth_tx,

            status_message: None,

            persist_config: false,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn navigate(&mut self, route: Route) {
        self.router.navigate(route);
        self.status_message = None;
    }

    pub fn go_back(&mut self) {
        if !self.router.back() {
            self.status_message = Some("Nothing to go back to".to_string());
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.context().user()
    }

    #[cfg(test)]
    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login form. The request runs in the background; a second
    /// submit while it is pending is ignored.
    pub fn submit_login(&mut self) {
        let request = match self.login.begin_submit() {
            Submission::Send(request) => request,
            Submission::Ignored => {
                debug!("Login already in progress");
                return;
            }
            Submission::Invalid(e) => {
                debug!(reason = %e, "Login form invalid");
                return;
            }
        };

        let api = self.api.clone();
        let tx = self.auth_tx.clone();
        tokio::spawn(async move {
            let result = api.login(&request).await;
            let _ = tx.send(AuthResult::Login(result)).await;
        });
    }

    pub fn submit_signup(&mut self) {
        let request = match self.signup.begin_submit() {
            Submission::Send(request) => request,
            Submission::Ignored => {
                debug!("Signup already in progress");
                return;
            }
            Submission::Invalid(e) => {
                debug!(reason = %e, "Signup form invalid");
                return;
            }
        };

        let api = self.api.clone();
        let tx = self.auth_tx.clone();
        tokio::spawn(async move {
            let result = api.register(&request).await;
            let _ = tx.send(AuthResult::Signup(result)).await;
        });
    }

    /// Forget the session and return to the login page
    pub fn logout(&mut self) {
        if let Err(e) = self.session.sign_out() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.api.clear_token();
        self.toaster.info("Logged out");
        self.login_focus = LoginFocus::Email;
        self.navigate(Route::Login);
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Check for completed auth requests and settle their forms
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.auth_rx.try_recv() {
            self.process_auth_result(result);
        }
    }

    fn process_auth_result(&mut self, result: AuthResult) {
        match result {
            AuthResult::Login(result) => {
                let outcome = self.login.settle(result, &self.session, &self.toaster);
                if let LoginOutcome::LoggedIn { ref token } = outcome {
                    self.api.set_token(token.clone());
                    self.remember_email();
                }
                if let Some(route) = outcome.navigate_to() {
                    self.navigate(route);
                }
            }
            AuthResult::Signup(result) => {
                let outcome = self.signup.settle(result, &self.toaster);
                if let Some(route) = outcome.navigate_to() {
                    info!("Profile created, returning to login");
                    self.navigate(route);
                }
            }
        }
    }

    fn remember_email(&mut self) {
        self.config.last_email = Some(self.login.email.trim().to_string());
        if !self.persist_config {
            return;
        }
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    /// Per-frame housekeeping: expire toasts
    pub fn tick(&mut self) {
        self.toasts.poll(Utc::now());
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_full_name_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FULL_NAME_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use spendtrack_core::api::{Endpoints, DEFAULT_BASE_URL};
    use spendtrack_core::auth::{FileTokenStore, TokenStore};

    /// App over temp storage; the directory must outlive the app
    pub(crate) fn test_app(dir: &std::path::Path) -> App {
        let api = ApiClient::new(Endpoints::new(DEFAULT_BASE_URL, None).expect("valid base"))
            .expect("client builds");
        let session = Session::new(Box::new(FileTokenStore::new(dir)), SessionContext::new());
        App::from_parts(Config::default(), api, session)
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    #[test]
    fn test_starts_on_login_without_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_app(dir.path());
        assert_eq!(app.route(), Route::Login);
        assert!(app.api.token().is_none());
    }

    #[test]
    fn test_starts_on_dashboard_with_stored_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        FileTokenStore::new(dir.path()).save("abc").expect("save");
        let app = test_app(dir.path());
        assert_eq!(app.route(), Route::Dashboard);
        assert_eq!(app.api.token(), Some("abc"));
    }

    #[test]
    fn test_prefills_last_email() {
        let dir = tempfile::tempdir().expect("tempdir");
        let api = ApiClient::new(Endpoints::new(DEFAULT_BASE_URL, None).expect("valid base"))
            .expect("client builds");
        let session = Session::new(
            Box::new(FileTokenStore::new(dir.path())),
            SessionContext::new(),
        );
        let config = Config {
            last_email: Some("a@b.com".to_string()),
            ..Config::default()
        };
        let app = App::from_parts(config, api, session);
        assert_eq!(app.login.email, "a@b.com");
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    #[test]
    fn test_invalid_login_does_not_spawn() {
        // No runtime here: spawning would panic, so this also proves nothing was sent
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        app.submit_login();
        assert_eq!(app.login.error(), Some("Please enter a valid email."));
        assert!(!app.login.is_submitting());
    }

    #[test]
    fn test_login_result_navigates_and_sets_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        app.login.email = "a@b.com".to_string();
        assert!(matches!(app.login.begin_submit(), Submission::Send(_)));

        app.process_auth_result(AuthResult::Login(Ok(LoginResponse {
            token: Some("abc".to_string()),
            user: Some(User::new(serde_json::json!({"fullName": "John Doe"}))),
        })));

        assert_eq!(app.route(), Route::Dashboard);
        assert_eq!(app.api.token(), Some("abc"));
        assert_eq!(
            app.current_user().and_then(|u| u.full_name().map(String::from)),
            Some("John Doe".to_string())
        );
    }

    #[test]
    fn test_missing_token_keeps_login_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        app.login.email = "a@b.com".to_string();
        app.login.begin_submit();

        app.process_auth_result(AuthResult::Login(Ok(LoginResponse::default())));

        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.login.error(), None);
        assert!(!app.login.is_submitting());
    }

    #[test]
    fn test_signup_result_navigates_to_login() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        app.navigate(Route::Signup);
        app.signup.full_name = "John".to_string();
        app.signup.email = "a@b.com".to_string();
        app.signup.begin_submit();

        app.process_auth_result(AuthResult::Signup(Ok(StatusCode::CREATED)));
        assert_eq!(app.route(), Route::Login);
    }

    #[test]
    fn test_signup_non_created_stays() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        app.navigate(Route::Signup);
        app.signup.full_name = "John".to_string();
        app.signup.email = "a@b.com".to_string();
        app.signup.begin_submit();

        app.process_auth_result(AuthResult::Signup(Ok(StatusCode::ACCEPTED)));
        assert_eq!(app.route(), Route::Signup);
        assert_eq!(app.signup.error(), Some("Unexpected response status: 202"));
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        FileTokenStore::new(dir.path()).save("abc").expect("save");
        let mut app = test_app(dir.path());
        assert_eq!(app.route(), Route::Dashboard);

        app.logout();

        assert_eq!(app.route(), Route::Login);
        assert!(app.api.token().is_none());
        assert_eq!(app.session.stored_token().expect("load"), None);
    }

    #[tokio::test]
    async fn test_background_login_round_trip_with_unreachable_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let api = ApiClient::new(
            Endpoints::new("http://127.0.0.1:9/api", None).expect("valid base"),
        )
        .expect("client builds");
        let session = Session::new(
            Box::new(FileTokenStore::new(dir.path())),
            SessionContext::new(),
        );
        let mut app = App::from_parts(Config::default(), api, session);
        app.login.email = "a@b.com".to_string();

        app.submit_login();
        assert!(app.login.is_submitting());
        app.submit_login(); // ignored while in flight

        for _ in 0..100 {
            app.check_background_tasks();
            if !app.login.is_submitting() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        assert!(app.login.error().is_some());
        assert_eq!(app.route(), Route::Login);
    }

    // -------------------------------------------------------------------------
    // Focus Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_focus_cycle() {
        assert_eq!(LoginFocus::Email.next(), LoginFocus::Password);
        assert_eq!(LoginFocus::SignupLink.next(), LoginFocus::Email); // Wraps around
        assert_eq!(LoginFocus::Email.prev(), LoginFocus::SignupLink);
    }

    #[test]
    fn test_signup_focus_cycle() {
        let mut focus = SignupFocus::FullName;
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, SignupFocus::FullName);
        assert_eq!(SignupFocus::FullName.prev(), SignupFocus::LoginLink);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(253, '@'));
        assert!(!can_add_email_char(254, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_full_name_char() {
        assert!(can_add_full_name_char(0, 'J'));
        assert!(can_add_full_name_char(0, ' '));
        assert!(!can_add_full_name_char(100, 'a'));
        assert!(!can_add_full_name_char(0, '\t'));
    }
}
