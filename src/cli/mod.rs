//! CLI command handling
//!
//! Resolves configuration and dispatches subcommands.

use colored::Colorize;

use crate::commands::{Commands, ConnectionArgs};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::testing::{self, RunOptions};

/// Resolve configuration: file, then environment, then flags
pub fn resolve_config(args: &ConnectionArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    config.apply_overrides(args.overrides());
    Ok(config)
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: Config, verbose: bool) -> Result<()> {
    match command {
        Commands::Run { only, json } => {
            let options = RunOptions {
                only,
                echo: !json,
                verbose,
            };

            let report = testing::run_suite(&config, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }

            if report.all_passed() {
                Ok(())
            } else {
                Err(Error::StepsFailed {
                    failed: report.failed(),
                    total: report.steps.len(),
                })
            }
        }

        Commands::Steps => {
            for (i, step) in testing::story_crud_steps().iter().enumerate() {
                println!(
                    "{:>2}. {} {}",
                    i + 1,
                    format!("{:<22}", step.name).bold(),
                    step.description.dimmed()
                );
            }
            Ok(())
        }

        Commands::Config => {
            print!("{}", config.redacted().to_toml()?);
            println!("# api root: {}", config.api_root());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_config_flags_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://file-host\"\napi_base = \"/v1\""
        )
        .unwrap();

        let args = ConnectionArgs {
            config: Some(file.path().to_path_buf()),
            base_url: Some("http://flag-host".into()),
            api_base: None,
            user: Some("flag-user".into()),
            password: Some("flag-pass".into()),
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.api.base_url, "http://flag-host");
        assert_eq!(config.credentials.username, "flag-user");
        assert_eq!(config.credentials.password, "flag-pass");
    }
}
