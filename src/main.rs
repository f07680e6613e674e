//! storyspoiler - end-to-end checks for the Story Spoiler API
//!
//! Logs in, then creates, edits, lists and deletes a story, checking status
//! codes and response messages at every step.

use clap::Parser;
use storyspoiler::cli;
use storyspoiler::commands::{Commands, ConnectionArgs};
use storyspoiler::common::logging;

#[derive(Parser)]
#[command(name = "storyspoiler", about = "End-to-end checks for the Story Spoiler API")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Verbose output (request lines, debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    let result = match cli::resolve_config(&cli.connection) {
        Ok(config) => cli::dispatch(cli.command, config, cli.verbose).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
