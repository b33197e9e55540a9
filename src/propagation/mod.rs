// src/propagation/mod.rs
//! Adsorption label propagation as a bounded fixed-point iteration.
//!
//! [`Propagator::step`] is the pure transition; [`Solver`] drives it until the
//! largest per-label change drops under the threshold or the iteration budget
//! runs out. Running out of budget is not an error: the last snapshot is
//! returned as-is and [`RunSummary::converged`] is false.

pub mod state;
pub mod step;

pub use state::{LabelVector, PropagationState, SeedLabels};
pub use step::Propagator;

use crate::graph::WeightTable;

/// Hard cap on adsorption rounds.
pub const MAX_ITERATIONS: usize = 15;
/// A round whose largest label change is below this ends the run.
pub const CONVERGENCE_THRESHOLD: f64 = 0.01;

/// Progress of a single completed round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// 1-based round number.
    pub iteration: usize,
    /// `None` on the first round, or when no node was comparable.
    pub delta: Option<f64>,
    /// Nodes in the snapshot this round produced.
    pub nodes: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub iterations: usize,
    pub converged: bool,
    pub last_delta: Option<f64>,
}

/// Final snapshot plus how the run ended.
#[derive(Debug, Clone)]
pub struct Propagation {
    pub state: PropagationState,
    pub summary: RunSummary,
}

/// Drives a state transition to a fixed point within a step budget.
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    max_iterations: usize,
    threshold: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            threshold: CONVERGENCE_THRESHOLD,
        }
    }
}

impl Solver {
    #[must_use]
    pub fn new(max_iterations: usize, threshold: f64) -> Self {
        Self {
            max_iterations,
            threshold,
        }
    }

    /// Applies `step` to `initial` until convergence or budget exhaustion.
    ///
    /// The convergence test is skipped on the first round. A round where no
    /// node exists in both the old and new snapshot counts as converged.
    pub fn run<S, F>(&self, initial: PropagationState, step: S, mut on_iteration: F) -> Propagation
    where
        S: Fn(&PropagationState) -> PropagationState,
        F: FnMut(&IterationReport),
    {
        let mut current = initial;
        let mut iteration = 0;
        let mut converged = false;
        let mut last_delta = None;

        while !converged && iteration < self.max_iterations {
            let next = step(&current);

            let mut delta = None;
            if iteration > 0 {
                delta = next.max_delta(&current);
                converged = delta.map_or(true, |d| d < self.threshold);
                last_delta = delta;
            }

            on_iteration(&IterationReport {
                iteration: iteration + 1,
                delta,
                nodes: next.len(),
                converged,
            });

            current = next;
            iteration += 1;
        }

        Propagation {
            state: current,
            summary: RunSummary {
                iterations: iteration,
                converged,
                last_delta,
            },
        }
    }
}

/// Runs adsorption over `weights` from the seed users' initial state.
pub fn propagate<F>(weights: &WeightTable, seeds: &SeedLabels, on_iteration: F) -> Propagation
where
    F: FnMut(&IterationReport),
{
    let propagator = Propagator::new(weights, seeds);
    Solver::default().run(seeds.initial_state(), |s| propagator.step(s), on_iteration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;

    fn constant(value: f64) -> impl Fn(&PropagationState) -> PropagationState {
        move |_: &PropagationState| {
            [(NodeId::Post(1), LabelVector::from([(NodeId::User(1), value)]))]
                .into_iter()
                .collect()
        }
    }

    #[test]
    fn stable_step_stops_after_second_round() {
        let mut rounds = Vec::new();
        let run = Solver::default().run(PropagationState::default(), constant(0.5), |r| {
            rounds.push(*r);
        });

        assert!(run.summary.converged);
        assert_eq!(run.summary.iterations, 2);
        assert_eq!(rounds[0].delta, None);
        assert_eq!(rounds[1].delta, Some(0.0));
    }

    #[test]
    fn budget_caps_oscillating_step() {
        let flip = std::cell::Cell::new(false);
        let step = |_: &PropagationState| -> PropagationState {
            flip.set(!flip.get());
            let v = if flip.get() { 1.0 } else { 0.0 };
            [(NodeId::Post(1), LabelVector::from([(NodeId::User(1), v)]))]
                .into_iter()
                .collect()
        };

        let run = Solver::default().run(PropagationState::default(), step, |_| {});

        assert!(!run.summary.converged);
        assert_eq!(run.summary.iterations, MAX_ITERATIONS);
        assert_eq!(run.summary.last_delta, Some(1.0));
    }

    #[test]
    fn empty_intersection_counts_as_converged() {
        let counter = std::cell::Cell::new(0_i64);
        let step = |_: &PropagationState| -> PropagationState {
            counter.set(counter.get() + 1);
            [(NodeId::Post(counter.get()), LabelVector::new())]
                .into_iter()
                .collect()
        };

        let run = Solver::new(10, 0.01).run(PropagationState::default(), step, |_| {});

        assert!(run.summary.converged);
        assert_eq!(run.summary.iterations, 2);
        assert_eq!(run.summary.last_delta, None);
    }
}
