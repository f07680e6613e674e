//! Authenticated session shared by every scenario step

use crate::auth::{self, Credentials};
use crate::common::config::Config;
use crate::common::Result;
use crate::http::ApiClient;

/// API root, access token and the client configured to send it
///
/// The token is set once by [`Session::bootstrap`] and never refreshed.
/// Dropping the session releases the client.
pub struct Session {
    client: ApiClient,
    token: Option<String>,
}

impl Session {
    /// Unauthenticated session for the configured API root
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config.api_root())?,
            token: None,
        })
    }

    /// Validate credentials, log in, and switch to a bearer-token client
    pub async fn bootstrap(config: &Config) -> Result<Self> {
        let credentials = Credentials::from_config(&config.credentials)?;
        let session = Self::new(config)?;

        let token = auth::login(&session.client, &credentials).await?;
        let client = session.client.with_bearer(&token)?;
        tracing::info!(root = %client.root(), "authenticated");

        Ok(Self {
            client,
            token: Some(token),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        self.client.root()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
