//! Authentication bootstrap
//!
//! Logs in once with `POST User/Authentication` and hands back the access
//! token. Every failure here is fatal for the run.

use serde::Serialize;

use crate::common::config::CredentialsConfig;
use crate::common::{Error, Result};
use crate::http::{ApiClient, ApiRequest, StatusCode};
use crate::inspect::extract_string_field;

/// Endpoint path of the login call
pub const LOGIN_PATH: &str = "User/Authentication";

/// Validated, non-blank login credentials
#[derive(Clone)]
pub struct Credentials {
    user_name: String,
    password: String,
}

impl Credentials {
    /// Reject blank user names and passwords before any request is sent
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let user_name = user_name.into();
        let password = password.into();
        if user_name.trim().is_empty() {
            return Err(Error::missing_user());
        }
        if password.trim().is_empty() {
            return Err(Error::missing_password());
        }
        Ok(Self {
            user_name,
            password,
        })
    }

    pub fn from_config(config: &CredentialsConfig) -> Result<Self> {
        Self::new(&config.username, &config.password)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"********")
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    user_name: &'a str,
    password: &'a str,
}

/// Perform the login call and return the access token
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<String> {
    tracing::info!(user = %credentials.user_name, "authenticating");

    let request = ApiRequest::post(LOGIN_PATH).json(&LoginBody {
        user_name: &credentials.user_name,
        password: &credentials.password,
    })?;
    let response = client.send(&request).await?;

    if response.status != StatusCode::OK {
        return Err(Error::login_failed(response.status, &response.body));
    }

    match extract_string_field(&response.body, "accessToken").found() {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(Error::MissingToken),
    }
}
