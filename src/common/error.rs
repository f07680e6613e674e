//! Error types for the Story Spoiler checker
//!
//! Setup errors abort the whole run. Step errors are captured per step by the
//! runner and reported alongside the HTTP status and raw body.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the checker
#[derive(Error, Debug)]
pub enum Error {
    // === Bootstrap Errors ===
    #[error("{field} is missing. Set {env_var} env var or configure a default {field_lower}.")]
    MissingCredential {
        field: &'static str,
        field_lower: &'static str,
        env_var: &'static str,
    },

    #[error("Login failed: {status} -> {body}")]
    LoginFailed { status: String, body: String },

    #[error("No accessToken returned on authentication.")]
    MissingToken,

    // === HTTP Errors ===
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // === Step Errors ===
    #[error("{0}")]
    Precondition(String),

    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("{failed} of {total} steps failed")]
    StepsFailed { failed: usize, total: usize },

    #[error("Unknown step '{name}'. Available: {available}")]
    UnknownStep { name: String, available: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing username error
    pub fn missing_user() -> Self {
        Self::MissingCredential {
            field: "Username",
            field_lower: "user",
            env_var: "STORY_USER",
        }
    }

    /// Create a missing password error
    pub fn missing_password() -> Self {
        Self::MissingCredential {
            field: "Password",
            field_lower: "password",
            env_var: "STORY_PASS",
        }
    }

    /// Create a login failed error from the raw response
    pub fn login_failed(status: reqwest::StatusCode, body: &str) -> Self {
        Self::LoginFailed {
            status: status.to_string(),
            body: body.to_string(),
        }
    }

    /// Create an unknown step error listing the registered names
    pub fn unknown_step<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        Self::UnknownStep {
            name: name.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
