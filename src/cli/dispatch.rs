// src/cli/dispatch.rs
//! Routes parsed subcommands to their handlers.

use super::{
    args::Commands,
    handlers::{handle_run, handle_stats, RunArgs},
};
use crate::exit::FeedRankExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<FeedRankExit> {
    match command {
        Commands::Run {
            input,
            output,
            config,
            threads,
            events,
        } => handle_run(&RunArgs {
            input,
            output,
            config,
            threads,
            events,
        }),
        Commands::Stats { input, config } => handle_stats(&input, config.as_deref()),
    }
}
