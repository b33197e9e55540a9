// src/pipeline.rs
//! Orchestrates graph construction, weighting, propagation and export.

use crate::error::Result;
use crate::events::{RunEvent, RunObserver};
use crate::export::{self, ScoreRow, MIN_SCORE};
use crate::graph::{builder, weights, CollisionPolicy, RawEdges};
use crate::propagation::{self, PropagationState, RunSummary, SeedLabels};

/// Everything the core needs from the storage layer.
#[derive(Debug, Clone, Default)]
pub struct RankInput {
    pub users: Vec<i64>,
    pub posts: Vec<i64>,
    pub edges: RawEdges,
}

#[derive(Debug, Clone)]
pub struct RankOutput {
    /// Dense score table, ordered by user then post.
    pub scores: Vec<ScoreRow>,
    pub summary: RunSummary,
    /// Final label distribution, kept for inspection.
    pub state: PropagationState,
}

/// One ranking run over a snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    collision: CollisionPolicy,
}

impl Pipeline {
    #[must_use]
    pub fn new(collision: CollisionPolicy) -> Self {
        Self { collision }
    }

    /// Builds the graph, propagates labels and scores every (user, post) pair.
    ///
    /// # Errors
    /// Returns `RankError::MalformedEdge` before any iteration runs if an edge
    /// cannot be parsed.
    pub fn run(&self, input: &RankInput, observer: &dyn RunObserver) -> Result<RankOutput> {
        let graph = builder::build(&input.edges)?;
        observer.record(&RunEvent::GraphBuilt {
            edges: graph.edge_count(),
            nodes: graph.participants().len(),
            users: input.users.len(),
            posts: input.posts.len(),
        });

        let table = weights::assign(&graph, self.collision);
        observer.record(&RunEvent::WeightsAssigned {
            sources: table.source_count(),
            entries: table.entry_count(),
            collisions: table.collisions(),
        });

        let seeds = SeedLabels::from_users(&input.users);
        let result = propagation::propagate(&table, &seeds, |report| {
            observer.record(&RunEvent::IterationCompleted {
                iteration: report.iteration,
                delta: report.delta,
                nodes: report.nodes,
            });
        });

        let summary = result.summary;
        if summary.converged {
            observer.record(&RunEvent::Converged {
                iterations: summary.iterations,
            });
        } else {
            observer.record(&RunEvent::IterationCapReached {
                iterations: summary.iterations,
                last_delta: summary.last_delta,
            });
        }

        let scores = export::export_scores(&result.state, &input.users, &input.posts);
        observer.record(&RunEvent::ScoresExported {
            rows: scores.len(),
            scored: scores.iter().filter(|r| r.score > MIN_SCORE).count(),
        });

        Ok(RankOutput {
            scores,
            summary,
            state: result.state,
        })
    }
}
