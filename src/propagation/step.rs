// src/propagation/step.rs
//! One adsorption round: propagate, aggregate, reset seeds.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::state::{LabelVector, PropagationState, SeedLabels};
use crate::graph::{WeightRow, WeightTable};
use crate::types::NodeId;

/// Pure state transition over a fixed weight table and seed set.
#[derive(Debug, Clone, Copy)]
pub struct Propagator<'a> {
    weights: &'a WeightTable,
    seeds: &'a SeedLabels,
}

impl<'a> Propagator<'a> {
    #[must_use]
    pub fn new(weights: &'a WeightTable, seeds: &'a SeedLabels) -> Self {
        Self { weights, seeds }
    }

    /// Computes the next snapshot from `state`. `state` itself is not touched.
    #[must_use]
    pub fn step(&self, state: &PropagationState) -> PropagationState {
        // Only nodes with both labels and outgoing weights propagate.
        let sources: Vec<(&LabelVector, &WeightRow)> = state
            .iter()
            .filter_map(|(node, labels)| self.weights.row(node).map(|row| (labels, row)))
            .collect();

        let emitted: Vec<Vec<(NodeId, NodeId, f64)>> = sources
            .par_iter()
            .map(|(labels, row)| emit(labels, row))
            .collect();

        // Folded in source order so the float sums are reproducible.
        let mut next: BTreeMap<NodeId, LabelVector> = BTreeMap::new();
        for (target, label, value) in emitted.into_iter().flatten() {
            *next.entry(target).or_default().entry(label).or_insert(0.0) += value;
        }

        self.seeds.reset(&mut next);
        PropagationState::from(next)
    }
}

/// (target, label, value) for every outgoing edge and every carried label.
fn emit(labels: &LabelVector, row: &WeightRow) -> Vec<(NodeId, NodeId, f64)> {
    let mut out = Vec::with_capacity(labels.len() * row.len());
    for (&target, &w) in row {
        for (&label, &value) in labels {
            out.push((target, label, value * w));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{self, RawEdges};
    use crate::graph::{weights, CollisionPolicy};

    #[test]
    fn contributions_from_several_sources_add_up() {
        // u1 and u2 both like p1; each carries weight 0.3 into it.
        let graph = builder::build(&RawEdges {
            user_likes_post: vec![(1, 10).into(), (2, 10).into()],
            ..RawEdges::default()
        })
        .unwrap();
        let table = weights::assign(&graph, CollisionPolicy::Sum);
        let seeds = SeedLabels::from_users(&[1, 2]);

        let next = Propagator::new(&table, &seeds).step(&seeds.initial_state());

        let p = NodeId::Post(10);
        assert!((next.weight(&p, &NodeId::User(1)).unwrap() - 0.3).abs() < 1e-12);
        assert!((next.weight(&p, &NodeId::User(2)).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn labels_travel_two_hops() {
        // u1 follows u2, u2 likes p1: after two rounds p1 holds a trace of u1.
        let graph =
            builder::build(&RawEdges::from_interactions(&[(2, 10)], &[], &[(1, 2)])).unwrap();
        let table = weights::assign(&graph, CollisionPolicy::Sum);
        let seeds = SeedLabels::from_users(&[1, 2]);
        let propagator = Propagator::new(&table, &seeds);

        let first = propagator.step(&seeds.initial_state());
        assert!(first.weight(&NodeId::Post(10), &NodeId::User(1)).is_none());

        let second = propagator.step(&first);
        let traced = second.weight(&NodeId::Post(10), &NodeId::User(1)).unwrap();
        // 0.2 (follow) * 0.3 (like)
        assert!((traced - 0.06).abs() < 1e-12);
    }

    #[test]
    fn nodes_without_weights_do_not_propagate() {
        let table = WeightTable::default();
        let seeds = SeedLabels::from_users(&[1]);
        let next = Propagator::new(&table, &seeds).step(&seeds.initial_state());
        assert_eq!(next, seeds.initial_state());
    }
}
