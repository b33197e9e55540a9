// src/bin/feedrank.rs
use clap::Parser;
use colored::Colorize;
use feedrank_core::cli::{self, Cli};
use feedrank_core::exit::FeedRankExit;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

fn main() -> FeedRankExit {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Logs go to stderr so scores can be piped from stdout.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let result = if let Some(cmd) = cli.command {
        cli::dispatch::execute(cmd)
    } else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        Ok(FeedRankExit::Success)
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            FeedRankExit::from_error(&e)
        }
    }
}
