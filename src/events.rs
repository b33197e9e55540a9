// src/events.rs
//! Run events and the observers that receive them.
//!
//! The pipeline never logs on its own; callers hand it a [`RunObserver`].
//! [`LogObserver`] forwards to the `log` facade, [`EventLogger`] appends
//! machine-readable events to a `.jsonl` file.

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEvent {
    GraphBuilt {
        edges: usize,
        nodes: usize,
        users: usize,
        posts: usize,
    },
    WeightsAssigned {
        sources: usize,
        entries: usize,
        collisions: usize,
    },
    IterationCompleted {
        iteration: usize,
        delta: Option<f64>,
        nodes: usize,
    },
    Converged {
        iterations: usize,
    },
    IterationCapReached {
        iterations: usize,
        last_delta: Option<f64>,
    },
    ScoresExported {
        rows: usize,
        scored: usize,
    },
}

/// Receives progress from a ranking run.
pub trait RunObserver: Sync {
    fn record(&self, event: &RunEvent);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn record(&self, _event: &RunEvent) {}
}

/// Writes events through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn record(&self, event: &RunEvent) {
        match event {
            RunEvent::GraphBuilt {
                edges,
                nodes,
                users,
                posts,
            } => log::info!(
                "Graph built: {edges} edges over {nodes} nodes ({users} users, {posts} posts known)"
            ),
            RunEvent::WeightsAssigned {
                sources,
                entries,
                collisions,
            } => {
                log::info!("Weights assigned: {entries} entries from {sources} sources");
                if *collisions > 0 {
                    log::debug!("{collisions} (source, target) pairs reached through more than one kind");
                }
            }
            RunEvent::IterationCompleted {
                iteration,
                delta,
                nodes,
            } => match delta {
                Some(d) => log::debug!("Completed iteration {iteration}: {nodes} nodes, max delta {d:.6}"),
                None => log::debug!("Completed iteration {iteration}: {nodes} nodes"),
            },
            RunEvent::Converged { iterations } => {
                log::info!("Converged after {iterations} iterations");
            }
            RunEvent::IterationCapReached {
                iterations,
                last_delta,
            } => log::warn!(
                "Stopped at the {iterations}-iteration cap without converging (last delta {})",
                last_delta.map_or_else(|| "n/a".to_string(), |d| format!("{d:.6}"))
            ),
            RunEvent::ScoresExported { rows, scored } => {
                log::info!("Exported {rows} scores ({scored} above the default)");
            }
        }
    }
}

/// Forwards each event to several observers in order.
#[derive(Default)]
pub struct Observers<'a> {
    inner: Vec<&'a dyn RunObserver>,
}

impl<'a> Observers<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, observer: &'a dyn RunObserver) -> Self {
        self.inner.push(observer);
        self
    }
}

impl RunObserver for Observers<'_> {
    fn record(&self, event: &RunEvent) {
        for observer in &self.inner {
            observer.record(event);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimedEvent<'a> {
    pub timestamp: u64,
    pub event: &'a RunEvent,
}

/// Appends events as JSON lines.
#[derive(Clone)]
pub struct EventLogger {
    log_path: PathBuf,
}

impl EventLogger {
    #[must_use]
    pub fn new(log_path: &Path) -> Self {
        Self {
            log_path: log_path.to_path_buf(),
        }
    }

    fn serialize_event(event: &RunEvent) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        Ok(serde_json::to_string(&TimedEvent { timestamp, event })?)
    }

    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl RunObserver for EventLogger {
    fn record(&self, event: &RunEvent) {
        // Best-effort: a failed write must not abort the ranking run.
        if let Ok(json) = Self::serialize_event(event) {
            if let Err(e) = self.append_to_file(&json) {
                log::warn!("Could not append to {}: {e}", self.log_path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl RunObserver for Recorder {
        fn record(&self, event: &RunEvent) {
            self.0.lock().unwrap().push(format!("{event:?}"));
        }
    }

    #[test]
    fn fan_out_reaches_every_observer() {
        let a = Recorder::default();
        let b = Recorder::default();
        let all = Observers::new().with(&a).with(&b).with(&NoopObserver);

        all.record(&RunEvent::Converged { iterations: 3 });

        assert_eq!(a.0.lock().unwrap().len(), 1);
        assert_eq!(b.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn event_logger_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");
        let logger = EventLogger::new(&path);

        logger.record(&RunEvent::Converged { iterations: 2 });
        logger.record(&RunEvent::ScoresExported { rows: 4, scored: 1 });

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"converged\""));
        assert!(lines[1].contains("\"rows\":4"));
    }
}
