//! API client for communicating with the expense-tracker REST backend.
//!
//! This module provides the `ApiClient` struct, the single configured HTTP
//! client that every page issues requests through.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

use super::{ApiError, AuthApi, Endpoint, Endpoints};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Bounds how long a form can sit in its submitting state.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the expense-tracker backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Arc<Endpoints>,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given endpoint registry
    pub fn new(endpoints: Endpoints) -> anyhow::Result<Self> {
        Self::with_timeout(endpoints, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Client whose requests fail with `ApiError::NetworkError` after `timeout`
    pub fn with_timeout(endpoints: Endpoints, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoints: Arc::new(endpoints),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            endpoints: Arc::clone(&self.endpoints),
            token: Some(token),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn url(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        self.endpoints
            .get(endpoint)
            .cloned()
            .ok_or(ApiError::EndpointNotConfigured(endpoint.name()))
    }

    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored token is not a valid header value, sending without it"),
            }
        }
        headers
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(endpoint)?;
        debug!(endpoint = endpoint.name(), %url, "POST");

        let response = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;

        Self::check_response(response).await
    }

    async fn get_text(&self, url: Url) -> Result<String, ApiError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.text().await?)
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Authenticate with email and password
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self.post_json(Endpoint::Login, request).await?;
        let body: LoginResponse = Self::parse_json(response).await?;
        info!(has_token = body.token.is_some(), "Login response received");
        Ok(body)
    }

    /// Register a new profile; returns the success status code
    pub async fn register(&self, request: &RegisterRequest) -> Result<StatusCode, ApiError> {
        let response = self.post_json(Endpoint::Register, request).await?;
        let status = response.status();
        info!(status = status.as_u16(), "Register response received");
        Ok(status)
    }

    /// Liveness probe
    pub async fn health(&self) -> Result<String, ApiError> {
        self.get_text(self.url(Endpoint::Health)?).await
    }

    /// Service status text
    pub async fn status(&self) -> Result<String, ApiError> {
        self.get_text(self.url(Endpoint::Status)?).await
    }

    /// Activate a newly registered profile with the token from the activation link
    pub async fn activate(&self, activation_token: &str) -> Result<String, ApiError> {
        let mut url = self.url(Endpoint::Activate)?;
        url.query_pairs_mut().append_pair("token", activation_token);
        self.get_text(url).await
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        ApiClient::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<StatusCode, ApiError> {
        ApiClient::register(self, request).await
    }
}
