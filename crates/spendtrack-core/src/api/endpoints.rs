//! Registry of backend URLs, built once at startup.
//!
//! Every URL is derived from a validated base, so a missing or malformed
//! base URL is reported when the registry is built rather than when the
//! first request goes out.

use reqwest::Url;

use super::EndpointError;

/// Backend base URL used when neither the environment nor the config file sets one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1.0";

/// Base for the third-party image host's unsigned upload API
const IMAGE_HOST_UPLOAD_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Logical backend operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Register,
    Status,
    Activate,
    Health,
    UploadImage,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Login,
        Endpoint::Register,
        Endpoint::Status,
        Endpoint::Activate,
        Endpoint::Health,
        Endpoint::UploadImage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Login => "LOGIN",
            Endpoint::Register => "REGISTER",
            Endpoint::Status => "STATUS",
            Endpoint::Activate => "ACTIVATE",
            Endpoint::Health => "HEALTH",
            Endpoint::UploadImage => "UPLOAD_IMAGE",
        }
    }

    /// Path segment appended to the base URL (None for third-party endpoints)
    fn segment(&self) -> Option<&'static str> {
        match self {
            Endpoint::Login => Some("login"),
            Endpoint::Register => Some("register"),
            Endpoint::Status => Some("status"),
            Endpoint::Activate => Some("activate"),
            Endpoint::Health => Some("health"),
            Endpoint::UploadImage => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    login: Url,
    register: Url,
    status: Url,
    activate: Url,
    health: Url,
    upload_image: Option<Url>,
}

impl Endpoints {
    /// Build the registry from a base URL and an optional image host account id.
    pub fn new(base_url: &str, image_host_account: Option<&str>) -> Result<Self, EndpointError> {
        let base = Self::parse_base(base_url)?;

        let upload_image = match image_host_account.map(str::trim) {
            None | Some("") => None,
            Some(account) => Some(Self::upload_url(account)?),
        };

        Ok(Self {
            login: Self::join(&base, Endpoint::Login),
            register: Self::join(&base, Endpoint::Register),
            status: Self::join(&base, Endpoint::Status),
            activate: Self::join(&base, Endpoint::Activate),
            health: Self::join(&base, Endpoint::Health),
            upload_image,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an operation to its URL. Only `UploadImage` can be absent.
    pub fn get(&self, endpoint: Endpoint) -> Option<&Url> {
        match endpoint {
            Endpoint::Login => Some(&self.login),
            Endpoint::Register => Some(&self.register),
            Endpoint::Status => Some(&self.status),
            Endpoint::Activate => Some(&self.activate),
            Endpoint::Health => Some(&self.health),
            Endpoint::UploadImage => self.upload_image.as_ref(),
        }
    }

    pub fn login(&self) -> &Url {
        &self.login
    }

    pub fn register(&self) -> &Url {
        &self.register
    }

    pub fn status(&self) -> &Url {
        &self.status
    }

    pub fn activate(&self) -> &Url {
        &self.activate
    }

    pub fn health(&self) -> &Url {
        &self.health
    }

    pub fn upload_image(&self) -> Option<&Url> {
        self.upload_image.as_ref()
    }

    fn parse_base(base_url: &str) -> Result<Url, EndpointError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(EndpointError::MissingBaseUrl);
        }

        let url = Url::parse(trimmed).map_err(|e| EndpointError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(EndpointError::UnsupportedBaseUrl(trimmed.to_string()));
        }

        Ok(url)
    }

    fn join(base: &Url, endpoint: Endpoint) -> Url {
        let mut url = base.clone();
        if let (Some(segment), Ok(mut segments)) = (endpoint.segment(), url.path_segments_mut()) {
            // Tolerate a trailing slash on the base
            segments.pop_if_empty().push(segment);
        }
        url
    }

    fn upload_url(account: &str) -> Result<Url, EndpointError> {
        let valid = account
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EndpointError::InvalidImageHostAccount(account.to_string()));
        }

        Url::parse(&format!("{}/{}/image/upload", IMAGE_HOST_UPLOAD_BASE, account))
            .map_err(|_| EndpointError::InvalidImageHostAccount(account.to_string()))
    }
}
