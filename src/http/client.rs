//! Client adapter for the Story Spoiler API

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::Serialize;

use crate::common::{Error, Result};

/// A request relative to the API root
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path, e.g. `Story/Edit/{id}`
    pub path: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(payload)?);
        Ok(self)
    }
}

/// Status code and raw body of a completed request
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// `"<code> <reason>. Body: <raw body>"`, for assertion messages
    pub fn describe(&self) -> String {
        format!("{}. Body: {}", self.status, self.body)
    }
}

/// HTTP client bound to an API root, optionally carrying a bearer token
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    root: String,
    authenticated: bool,
}

impl ApiClient {
    /// Create an anonymous client for the given API root
    pub fn new(root: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            root: root.into().trim_end_matches('/').to_string(),
            authenticated: false,
        })
    }

    /// Build a new client for the same root that sends `Authorization: Bearer <token>`
    pub fn with_bearer(&self, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            root: self.root.clone(),
            authenticated: true,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.root, path.trim_start_matches('/'))
    }

    /// Send a request and read the whole body as text
    ///
    /// Non-2xx statuses are not errors here; only transport failures are.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self.http.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(method = %request.method, %url, %status, bytes = body.len(), "received response");

        Ok(ApiResponse { status, body })
    }
}
