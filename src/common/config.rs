//! Configuration handling
//!
//! Settings are resolved in layers: built-in defaults, then the TOML config
//! file, then environment variables, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Environment variable overriding the service base URL
pub const ENV_BASE_URL: &str = "BASE_URL";
/// Environment variable overriding the API path prefix
pub const ENV_API_BASE: &str = "API_BASE";
/// Environment variable overriding the login user name
pub const ENV_USER: &str = "STORY_USER";
/// Environment variable overriding the login password
pub const ENV_PASS: &str = "STORY_PASS";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Service location
    #[serde(default)]
    pub api: ApiConfig,

    /// Login credentials used by the bootstrap
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Where the Story Spoiler API lives
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme and host, e.g. `https://example.net`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix prepended to every endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_base: default_api_base(),
        }
    }
}

fn default_base_url() -> String {
    "https://d3s5nxhwblsjbi.cloudfront.net".to_string()
}

fn default_api_base() -> String {
    "/api".to_string()
}

/// Login credentials
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn default_username() -> String {
    "billy12".to_string()
}

fn default_password() -> String {
    "billy12billy12".to_string()
}

/// Values passed explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_base: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Apply `BASE_URL`, `API_BASE`, `STORY_USER` and `STORY_PASS` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment-style overrides from an arbitrary lookup
    ///
    /// A variable that is set but empty still overrides; blank credentials
    /// are rejected later by the bootstrap.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_BASE_URL) {
            self.api.base_url = v;
        }
        if let Some(v) = lookup(ENV_API_BASE) {
            self.api.api_base = v;
        }
        if let Some(v) = lookup(ENV_USER) {
            self.credentials.username = v;
        }
        if let Some(v) = lookup(ENV_PASS) {
            self.credentials.password = v;
        }
    }

    /// Apply command-line overrides, which take precedence over everything else
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.base_url {
            self.api.base_url = v;
        }
        if let Some(v) = overrides.api_base {
            self.api.api_base = v;
        }
        if let Some(v) = overrides.username {
            self.credentials.username = v;
        }
        if let Some(v) = overrides.password {
            self.credentials.password = v;
        }
    }

    /// Base URL joined with the API prefix, without a trailing slash
    pub fn api_root(&self) -> String {
        let base = self.api.base_url.trim_end_matches('/');
        let prefix = self.api.api_base.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        }
    }

    /// Copy of this configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.credentials.password.is_empty() {
            copy.credentials.password = "********".to_string();
        }
        copy
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
