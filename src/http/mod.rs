//! HTTP plumbing for talking to the Story Spoiler API
//!
//! A thin wrapper over reqwest: requests are addressed relative to the API
//! root, responses are reduced to status code + raw body text.

mod client;

pub use client::{ApiClient, ApiRequest, ApiResponse};
pub use reqwest::{Method, StatusCode};
