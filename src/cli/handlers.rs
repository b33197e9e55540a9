// src/cli/handlers.rs
use crate::config::Config;
use crate::events::{EventLogger, LogObserver, Observers};
use crate::exit::FeedRankExit;
use crate::graph::{builder, weights};
use crate::pipeline::{Pipeline, RankOutput};
use crate::sink::{self, JsonLinesSink};
use crate::snapshot::Snapshot;
use crate::types::EdgeKind;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub threads: Option<usize>,
    pub events: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load(p).with_context(|| format!("reading config {}", p.display()))?,
        None => Config::load_local().context("reading feedrank.toml")?,
    };
    Ok(config)
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}

/// Handles the run command.
///
/// # Errors
/// Returns error if loading, ranking or writing the scores fails.
pub fn handle_run(args: &RunArgs) -> Result<FeedRankExit> {
    let mut config = load_config(args.config.as_deref())?;
    if args.threads.is_some() {
        config.run.threads = args.threads;
    }

    let input = load_snapshot(&args.input)?.into_input(&config.graph)?;

    let event_log = args.events.as_deref().map(EventLogger::new);
    let mut observers = Observers::new().with(&LogObserver);
    if let Some(logger) = &event_log {
        observers = observers.with(logger);
    }

    let pool = config.thread_pool()?;
    let pipeline = Pipeline::new(config.graph.collision);
    let output = pool.install(|| pipeline.run(&input, &observers))?;

    let written = write_output(&output, args.output.as_deref(), config.run.batch_size)?;
    print_run_summary(&output, written, args.output.as_deref());
    Ok(FeedRankExit::Success)
}

fn write_output(output: &RankOutput, path: Option<&Path>, batch_size: usize) -> Result<usize> {
    let written = if let Some(path) = path {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut sink = JsonLinesSink::new(file);
        sink::write_scores(&mut sink, &output.scores, batch_size)?
    } else {
        let mut sink = JsonLinesSink::new(io::stdout().lock());
        sink::write_scores(&mut sink, &output.scores, batch_size)?
    };
    Ok(written)
}

// Goes to stderr: stdout may be carrying the scores.
fn print_run_summary(output: &RankOutput, written: usize, path: Option<&Path>) {
    let summary = &output.summary;
    let status = if summary.converged {
        format!("converged after {} iterations", summary.iterations).green()
    } else {
        format!("hit the {}-iteration cap", summary.iterations).yellow()
    };
    eprintln!("{} {status}", "Adsorption".bold());

    let target = path.map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
    eprintln!("{} {written} scores -> {target}", "Wrote".bold());
}

/// Handles the stats command.
///
/// # Errors
/// Returns error if the snapshot or config cannot be loaded, or an edge is malformed.
pub fn handle_stats(input: &Path, config: Option<&Path>) -> Result<FeedRankExit> {
    let config = load_config(config)?;
    let input = load_snapshot(input)?.into_input(&config.graph)?;

    let graph = builder::build(&input.edges)?;
    let table = weights::assign(&graph, config.graph.collision);

    println!("{}", "Snapshot".bold().underline());
    println!("  users            {}", input.users.len());
    println!("  posts            {}", input.posts.len());
    println!("  pairs to score   {}", input.users.len() * input.posts.len());

    println!("{}", "Edges".bold().underline());
    for kind in EdgeKind::ALL {
        println!("  {:<24} {}", kind.label(), graph.edges(kind).len());
    }
    println!("  {:<24} {}", "participating nodes", graph.participants().len());

    println!("{}", "Weights".bold().underline());
    println!("  sources          {}", table.source_count());
    println!("  entries          {}", table.entry_count());
    let collisions = table.collisions();
    if collisions > 0 {
        println!(
            "  collisions       {} ({:?})",
            collisions.to_string().yellow(),
            config.graph.collision
        );
    } else {
        println!("  collisions       0");
    }

    Ok(FeedRankExit::Success)
}
