// src/graph/weights.rs
//! Per-kind edge weight normalization.
//!
//! A source splits each kind's base weight evenly across every edge of that
//! kind it emits. Duplicate edges count toward the split but collapse into a
//! single table entry.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::builder::InteractionGraph;
use crate::types::{EdgeKind, NodeId};

/// Target node -> propagation weight.
pub type WeightRow = BTreeMap<NodeId, f64>;

/// How to combine two kinds that connect the same (source, target) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Add the per-kind contributions.
    #[default]
    Sum,
    /// Keep the contribution of the kind enumerated last.
    LastWriteWins,
}

/// Source node -> outgoing weights. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    rows: BTreeMap<NodeId, WeightRow>,
    collisions: usize,
}

impl WeightTable {
    /// Outgoing weights of `source`, if it propagates at all.
    #[must_use]
    pub fn row(&self, source: &NodeId) -> Option<&WeightRow> {
        self.rows.get(source)
    }

    #[must_use]
    pub fn get(&self, source: &NodeId, target: &NodeId) -> Option<f64> {
        self.rows.get(source)?.get(target).copied()
    }

    /// Number of nodes that can act as propagation sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of (source, target) entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// (source, target) pairs that more than one kind tried to write.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Computes the normalized weight table for the whole graph.
#[must_use]
pub fn assign(graph: &InteractionGraph, policy: CollisionPolicy) -> WeightTable {
    let per_kind: Vec<BTreeMap<(NodeId, NodeId), f64>> = EdgeKind::ALL
        .par_iter()
        .map(|&kind| kind_weights(graph.edges(kind), kind.base_weight()))
        .collect();

    let mut table = WeightTable::default();
    for weights in per_kind {
        for ((source, target), weight) in weights {
            let row = table.rows.entry(source).or_default();
            match row.get_mut(&target) {
                Some(existing) => {
                    table.collisions += 1;
                    match policy {
                        CollisionPolicy::Sum => *existing += weight,
                        CollisionPolicy::LastWriteWins => *existing = weight,
                    }
                }
                None => {
                    row.insert(target, weight);
                }
            }
        }
    }
    table
}

/// `base / out_degree` for every edge of one kind, keyed by (source, target).
#[allow(clippy::cast_precision_loss)]
fn kind_weights(edges: &[(NodeId, NodeId)], base: f64) -> BTreeMap<(NodeId, NodeId), f64> {
    let mut degree: BTreeMap<NodeId, usize> = BTreeMap::new();
    for (source, _) in edges {
        *degree.entry(*source).or_default() += 1;
    }

    edges
        .iter()
        .map(|&(source, target)| {
            let count = degree.get(&source).copied().unwrap_or(1);
            ((source, target), base / count as f64)
        })
        .collect()
}
