//! read configuration from a file, the environment, or explicit values

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::errors::Error;

const DEFAULT_STORAGE_KEY: &str = "access_token";
const DEFAULT_USER_AGENT: &str = "access-client-rust/0.1.0";

/// Paths of the authentication endpoints, relative to `base_url`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub login: String,
    pub logout: String,
    pub ask_code: String,
    pub register: String,
    pub reset_confirm: String,
    pub reset_password: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "api/auth/login".into(),
            logout: "api/auth/logout".into(),
            ask_code: "api/auth/ask-code".into(),
            register: "api/auth/register".into(),
            reset_confirm: "api/auth/reset-confirm".into(),
            reset_password: "api/auth/reset-password".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Directory backing the persistent token scope.
    pub storage_dir: PathBuf,
    /// Key the token record is stored under, in both scopes.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Config {
    pub fn from_values(
        base_url: impl Into<String>,
        storage_dir: impl Into<PathBuf>,
        storage_key: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            storage_dir: storage_dir.into(),
            storage_key: storage_key.unwrap_or_else(default_storage_key),
            user_agent: default_user_agent(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Reads `ACCESS_BASE_URL`, `ACCESS_STORAGE_DIR` and the optional `ACCESS_STORAGE_KEY`.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("ACCESS_BASE_URL")
            .map_err(|_| Error::Config("Missing ACCESS_BASE_URL env var".to_string()))?;
        let storage_dir = std::env::var("ACCESS_STORAGE_DIR")
            .map_err(|_| Error::Config("Missing ACCESS_STORAGE_DIR env var".to_string()))?;
        let storage_key = std::env::var("ACCESS_STORAGE_KEY").ok();
        Ok(Self::from_values(base_url, storage_dir, storage_key))
    }

    /// Parses `base_url`, forcing a trailing slash so relative endpoints join beneath it.
    pub fn parsed_base_url(&self) -> Result<Url, Error> {
        let raw = if self.base_url.starts_with("http") {
            self.base_url.clone()
        } else {
            format!("https://{}", self.base_url)
        };
        let mut url = Url::parse(&raw)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("Base URL '{}' cannot be a base", raw)));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Checks the storage key and returns the parsed base URL.
    pub fn validate(&self) -> Result<Url, Error> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::Config("storage_key must not be empty".into()));
        }
        self.parsed_base_url()
    }
}
