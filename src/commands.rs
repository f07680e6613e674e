//! CLI command definitions
//!
//! Defines the clap commands for the storyspoiler CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::common::config::Overrides;

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate and run the CRUD scenario against the service
    Run {
        /// Only run the named step (repeatable). See `storyspoiler steps`
        #[arg(long = "only", value_name = "STEP")]
        only: Vec<String>,

        /// Print the report as JSON instead of progress lines
        #[arg(long)]
        json: bool,
    },

    /// List the scenario steps in execution order
    Steps,

    /// Show the resolved configuration (password masked)
    Config,
}

/// Connection settings shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Service base URL [env: BASE_URL]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API path prefix [env: API_BASE]
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Login user name [env: STORY_USER]
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Login password [env: STORY_PASS]
    #[arg(long, global = true)]
    pub password: Option<String>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            api_base: self.api_base.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
