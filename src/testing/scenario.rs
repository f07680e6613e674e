//! Scenario building blocks
//!
//! A scenario is an ordered list of [`Step`] descriptors. Each descriptor
//! builds one request from the [`ScenarioContext`] and verifies the response,
//! optionally publishing state for the steps after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::http::{ApiRequest, ApiResponse};
use crate::inspect::extract_string_field;

/// Builds the request for a step from the current scenario state
pub type BuildRequest = fn(&ScenarioContext) -> Result<ApiRequest>;

/// Checks a response and may publish state for later steps
pub type Verify = fn(&ApiResponse, &mut ScenarioContext) -> Result<()>;

/// One ordered unit of request + assertion
#[derive(Clone, Copy)]
pub struct Step {
    /// Stable identifier, used for `--only` selection and reports
    pub name: &'static str,
    /// Human readable summary of what the step checks
    pub description: &'static str,
    pub build: BuildRequest,
    pub verify: Verify,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// State threaded through a scenario run
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    story_id: Option<String>,
    started_at: DateTime<Utc>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    /// Context for a run started at a fixed instant
    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            story_id: None,
            started_at,
        }
    }

    /// Identifier published by the create step, if any
    pub fn story_id(&self) -> Option<&str> {
        self.story_id.as_deref()
    }

    /// Identifier published by the create step, or a precondition failure
    pub fn require_story_id(&self) -> Result<&str> {
        match self.story_id() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(Error::Precondition(
                "No identifier from create step.".to_string(),
            )),
        }
    }

    pub fn publish_story_id(&mut self, id: String) {
        tracing::debug!(story_id = %id, "published story id");
        self.story_id = Some(id);
    }

    /// Title for the story created by this run, e.g. `Exam Story 20240101_120000`
    pub fn created_title(&self) -> String {
        format!("Exam Story {}", self.started_at.format("%Y%m%d_%H%M%S"))
    }
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body for create and edit
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoryPayload {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StoryPayload {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: Some(String::new()),
        }
    }

    /// Payload with blank required fields and no url
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            url: None,
        }
    }
}

/// Structured view of a story operation response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryEnvelope {
    #[serde(default, rename = "storyId", alias = "StoryId", alias = "storyid")]
    pub story_id: Option<String>,
    #[serde(default, alias = "Msg", alias = "MSG")]
    pub msg: Option<String>,
}

impl StoryEnvelope {
    /// Deserialize the body, or `None` when it is blank or not a JSON object
    ///
    /// Fields the derive misses (other casings, duplicate keys) are filled
    /// from a case-insensitive lookup on the raw body.
    pub fn parse(body: &str) -> Option<Self> {
        if body.trim().is_empty() {
            return None;
        }

        let mut envelope = match serde_json::from_str::<Self>(body) {
            Ok(envelope) => envelope,
            Err(_) => {
                let value: serde_json::Value = serde_json::from_str(body).ok()?;
                if !value.is_object() {
                    return None;
                }
                Self::default()
            }
        };

        if envelope.story_id.is_none() {
            envelope.story_id = extract_string_field(body, "storyId").found();
        }
        if envelope.msg.is_none() {
            envelope.msg = extract_string_field(body, "msg").found();
        }
        Some(envelope)
    }
}
