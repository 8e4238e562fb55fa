//! REST API client module for the expense-tracker backend.
//!
//! This module provides:
//! - `Endpoints`: the validated registry of backend URLs
//! - `ApiClient`: the configured HTTP client every page talks through
//! - `AuthApi`: the login/register seam the auth flows are generic over
//!
//! Once a session exists the client attaches the stored token as a bearer
//! header on every request.

use std::future::Future;

use reqwest::StatusCode;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use endpoints::{Endpoint, Endpoints, DEFAULT_BASE_URL};
pub use error::{ApiError, EndpointError};

/// Authentication calls used by the login and signup flows.
pub trait AuthApi {
    /// Exchange credentials for a session token and user record
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Create a profile, returning the success status the backend answered with
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<StatusCode, ApiError>> + Send;
}
