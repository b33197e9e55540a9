// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedrank", version, about = "Adsorption feed ranking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank every (user, post) pair of a snapshot and write the scores
    Run {
        /// Interaction snapshot (JSON)
        #[arg(long, short, value_name = "FILE")]
        input: PathBuf,
        /// Score output (JSON lines); stdout when omitted
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Config file; defaults to ./feedrank.toml when present
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Worker threads (overrides config)
        #[arg(long)]
        threads: Option<usize>,
        /// Append machine-readable run events to this file
        #[arg(long, value_name = "FILE")]
        events: Option<PathBuf>,
    },
    /// Print graph and weight-table statistics without propagating
    Stats {
        #[arg(long, short, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}
