// src/propagation/state.rs
//! Label vectors, the per-iteration state snapshot and the seed set.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::types::NodeId;

/// Label (a seeding user) -> how much of that user's authority reached a node.
pub type LabelVector = BTreeMap<NodeId, f64>;

/// Node -> label vector. One immutable snapshot per iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationState {
    nodes: BTreeMap<NodeId, LabelVector>,
}

impl PropagationState {
    #[must_use]
    pub fn get(&self, node: &NodeId) -> Option<&LabelVector> {
        self.nodes.get(node)
    }

    /// Weight of `label` at `node`, if the node holds that label at all.
    #[must_use]
    pub fn weight(&self, node: &NodeId, label: &NodeId) -> Option<f64> {
        self.nodes.get(node)?.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &LabelVector)> {
        self.nodes.iter()
    }

    /// Entries whose node is a post.
    pub fn posts(&self) -> impl Iterator<Item = (&NodeId, &LabelVector)> {
        self.nodes.iter().filter(|(node, _)| node.is_post())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Largest per-label change between `self` and `previous`.
    ///
    /// Only nodes present in both snapshots are compared; a label missing on
    /// one side counts as 0. Returns `None` when no node is shared.
    #[must_use]
    pub fn max_delta(&self, previous: &Self) -> Option<f64> {
        let shared: Vec<(&LabelVector, &LabelVector)> = self
            .nodes
            .iter()
            .filter_map(|(node, new)| previous.nodes.get(node).map(|old| (new, old)))
            .collect();

        if shared.is_empty() {
            return None;
        }

        Some(
            shared
                .par_iter()
                .map(|(new, old)| vector_delta(new, old))
                .reduce(|| 0.0, f64::max),
        )
    }
}

impl FromIterator<(NodeId, LabelVector)> for PropagationState {
    fn from_iter<I: IntoIterator<Item = (NodeId, LabelVector)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<NodeId, LabelVector>> for PropagationState {
    fn from(nodes: BTreeMap<NodeId, LabelVector>) -> Self {
        Self { nodes }
    }
}

fn vector_delta(a: &LabelVector, b: &LabelVector) -> f64 {
    a.keys()
        .chain(b.keys())
        .map(|label| {
            let x = a.get(label).copied().unwrap_or(0.0);
            let y = b.get(label).copied().unwrap_or(0.0);
            (x - y).abs()
        })
        .fold(0.0, f64::max)
}

/// Every user seeds exactly one label: itself, pinned at 1.0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedLabels {
    users: BTreeSet<NodeId>,
}

impl SeedLabels {
    #[must_use]
    pub fn from_users(users: &[i64]) -> Self {
        Self {
            users: users.iter().map(|&id| NodeId::User(id)).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, node: &NodeId) -> bool {
        self.users.contains(node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// `{user: {user: 1.0}}` for every seeded user; posts start empty.
    #[must_use]
    pub fn initial_state(&self) -> PropagationState {
        self.users
            .iter()
            .map(|&user| (user, LabelVector::from([(user, 1.0)])))
            .collect()
    }

    /// Pins each seed's own label back to 1.0. Labels a user picked up from
    /// other users are left alone.
    pub(crate) fn reset(&self, nodes: &mut BTreeMap<NodeId, LabelVector>) {
        for &user in &self.users {
            nodes.entry(user).or_default().insert(user, 1.0);
        }
    }
}
