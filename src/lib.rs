//! Story Spoiler API checker
//!
//! This library drives an ordered end-to-end scenario against the Story
//! Spoiler service: one login, then create/edit/list/delete calls with
//! assertions on status codes and response messages.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod common;
pub mod http;
pub mod inspect;
pub mod session;
pub mod testing;

// Re-export commonly used types for tests
pub use common::config::Config;
pub use common::{Error, Result};
pub use session::Session;
