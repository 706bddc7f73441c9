//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Console output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Named remote targets suites can be bound to
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// HTTP client settings
#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout; unset leaves the client default in place
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("ricochet/{}", env!("CARGO_PKG_VERSION"))
}

/// Console output settings
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Colorize progress lines
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

/// A remote API a suite can be bound to
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Absolute base URL of the API
    pub base_url: String,

    /// Optional password-grant credentials bootstrapped before steps run
    #[serde(default)]
    pub oauth: Option<PasswordGrant>,
}

/// OAuth2 resource-owner password grant parameters
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordGrant {
    /// Token endpoint, relative to the suite base URL
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_optional(config_path().as_deref())
    }

    fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Get a target by name
    pub fn target(&self, name: &str) -> Result<&TargetConfig> {
        self.targets.get(name).ok_or_else(|| {
            let mut known: Vec<&str> = self.targets.keys().map(String::as_str).collect();
            known.sort_unstable();
            Error::Config(format!(
                "Unknown target '{}'. Configured targets: {:?}",
                name, known
            ))
        })
    }

    /// Build the HTTP client shared by bootstrap and request contexts
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.http.user_agent);
        if let Some(secs) = self.http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
    }
}
