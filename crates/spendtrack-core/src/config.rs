//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend base URL, the image host account, the token
//! storage backend and the last email used to log in.
//!
//! Configuration is stored at `~/.config/spendtrack/config.json`. The base
//! URL and image host account can be overridden from the environment.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::{EndpointError, Endpoints, DEFAULT_BASE_URL};
use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "spendtrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment override for the backend base URL
pub const BASE_URL_ENV: &str = "SPENDTRACK_API_BASE_URL";

/// Environment override for the image host account id
pub const IMAGE_HOST_ENV: &str = "SPENDTRACK_IMAGE_HOST_ACCOUNT";

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub image_host_account: Option<String>,
    #[serde(default)]
    pub last_email: Option<String>,
    #[serde(default)]
    pub token_storage: TokenStorage,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for durable client state (token storage, logs)
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Build the endpoint registry from the environment and this config.
    pub fn endpoints(&self) -> Result<Endpoints, EndpointError> {
        self.endpoints_with(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(IMAGE_HOST_ENV).ok(),
        )
    }

    /// Resolution order: environment, config file, built-in default.
    /// A variable that is set but blank is an error, not a fallback.
    pub fn endpoints_with(
        &self,
        env_base_url: Option<String>,
        env_image_host: Option<String>,
    ) -> Result<Endpoints, EndpointError> {
        let base_url = env_base_url
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let image_host = env_image_host.or_else(|| self.image_host_account.clone());

        Endpoints::new(&base_url, image_host.as_deref())
    }

    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        Ok(match self.token_storage {
            TokenStorage::File => Box::new(FileTokenStore::new(&self.data_dir()?)),
            TokenStorage::Keyring => Box::new(KeyringTokenStore::new()?),
        })
    }
}
