//! FeedbackHub configuration
//!
//! Collaborator endpoints, HTTP timeout and the operator's session cookie.
//! Resolution order for the file: explicit path, `FEEDBACKHUB_CONFIG`, then
//! `<config dir>/feedbackhub/config.toml`; missing files fall back to defaults.
//! Environment variables override individual values afterwards.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "FEEDBACKHUB_CONFIG";
pub const DASHBOARD_URL_ENV: &str = "FEEDBACKHUB_DASHBOARD_URL";
pub const SENTIMENT_URL_ENV: &str = "FEEDBACKHUB_SENTIMENT_URL";
pub const IDENTITY_URL_ENV: &str = "FEEDBACKHUB_IDENTITY_URL";
pub const SESSION_COOKIE_ENV: &str = "FEEDBACKHUB_SESSION_COOKIE";

const DEFAULT_DASHBOARD_URL: &str = "https://feedback-backend.railway.internal";
const DEFAULT_SENTIMENT_URL: &str = "https://feedback-backend-hkqy.onrender.com";
const DEFAULT_IDENTITY_URL: &str = "https://feedback-backend-3-0hi9.onrender.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackHubConfig {
    /// Dashboard and deletion endpoints
    pub dashboard: EndpointConfig,

    /// Sentiment classifier
    pub sentiment: EndpointConfig,

    /// Session lookup and logout
    pub identity: EndpointConfig,

    pub http: HttpConfig,
}

/// Base URL of one collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Sent verbatim as the `Cookie` header on credentialed requests
    pub session_cookie: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_cookie: None,
        }
    }
}

impl Default for FeedbackHubConfig {
    fn default() -> Self {
        Self::hosted()
    }
}

impl EndpointConfig {
    fn with_url(url: &str) -> Self {
        Self {
            base_url: url.to_string(),
        }
    }

    /// Parsed base URL
    pub fn url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("invalid base_url '{}': {}", self.base_url, e))
        })
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FeedbackHubConfig {
    /// Defaults pointing at the hosted backends
    pub fn hosted() -> Self {
        Self {
            dashboard: EndpointConfig::with_url(DEFAULT_DASHBOARD_URL),
            sentiment: EndpointConfig::with_url(DEFAULT_SENTIMENT_URL),
            identity: EndpointConfig::with_url(DEFAULT_IDENTITY_URL),
            http: HttpConfig::default(),
        }
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    ///
    /// Sections left out of the document keep their hosted defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Partial {
            dashboard: Option<EndpointConfig>,
            sentiment: Option<EndpointConfig>,
            identity: Option<EndpointConfig>,
            http: Option<HttpConfig>,
        }

        let partial: Partial = toml::from_str(toml_str)?;
        let hosted = Self::hosted();
        let config = Self {
            dashboard: partial.dashboard.unwrap_or(hosted.dashboard),
            sentiment: partial.sentiment.unwrap_or(hosted.sentiment),
            identity: partial.identity.unwrap_or(hosted.identity),
            http: partial.http.unwrap_or(hosted.http),
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolve, load and apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("Loading config from {}", path.display());
                    Self::from_file(&path)?
                }
                None => {
                    debug!("No config file found, using hosted defaults");
                    Self::hosted()
                }
            },
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Override values from `FEEDBACKHUB_*` environment variables
    pub fn apply_env(&mut self) {
        if let Some(url) = non_empty_env(DASHBOARD_URL_ENV) {
            self.dashboard.base_url = url;
        }
        if let Some(url) = non_empty_env(SENTIMENT_URL_ENV) {
            self.sentiment.base_url = url;
        }
        if let Some(url) = non_empty_env(IDENTITY_URL_ENV) {
            self.identity.base_url = url;
        }
        if let Some(cookie) = non_empty_env(SESSION_COOKIE_ENV) {
            debug!("Using session cookie from {}", SESSION_COOKIE_ENV);
            self.http.session_cookie = Some(cookie);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dashboard.url()?;
        self.sentiment.url()?;
        self.identity.url()?;

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "http.timeout_secs must be at least 1".to_string(),
            ));
        }

        if let Some(cookie) = &self.http.session_cookie {
            if cookie.trim().is_empty() || cookie.contains(&['\r', '\n'][..]) {
                return Err(ConfigError::ValidationError(
                    "http.session_cookie must be a single non-empty header value".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// `<config dir>/feedbackhub/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("feedbackhub").join("config.toml"))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
