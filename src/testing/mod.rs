//! E2E scenario runner for the Story Spoiler API
//!
//! The scenario is an explicit, ordered list of step descriptors executed by
//! a small driver. State produced by one step (the created story's id) is
//! carried in a [`ScenarioContext`] passed to every step.

mod runner;
mod scenario;
mod steps;

pub use runner::{run_steps, run_suite, select_steps, RunOptions, StepResult, SuiteReport};
pub use scenario::{BuildRequest, ScenarioContext, Step, StoryEnvelope, StoryPayload, Verify};
pub use steps::{story_crud_steps, MISSING_STORY_ID};
