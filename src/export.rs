// src/export.rs
//! Projects post label weights onto a dense (user, post) score table.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::propagation::PropagationState;
use crate::types::NodeId;

/// Score given to every pair the propagation never reached.
pub const MIN_SCORE: u32 = 1;
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub user_id: i64,
    pub post_id: i64,
    pub score: u32,
}

/// Maps a label weight to `max(1, floor(weight * 100))`, capped at 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn weight_to_score(weight: f64) -> u32 {
    let scaled = (weight * 100.0).floor();
    if scaled.is_nan() || scaled < f64::from(MIN_SCORE) {
        MIN_SCORE
    } else if scaled >= f64::from(MAX_SCORE) {
        MAX_SCORE
    } else {
        scaled as u32
    }
}

/// One row per distinct (user, post) pair, ordered by user then post.
#[must_use]
pub fn export_scores(state: &PropagationState, users: &[i64], posts: &[i64]) -> Vec<ScoreRow> {
    let users: Vec<i64> = users.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let posts: Vec<i64> = posts.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    users
        .par_iter()
        .flat_map_iter(|&user_id| {
            let label = NodeId::User(user_id);
            posts.iter().map(move |&post_id| ScoreRow {
                user_id,
                post_id,
                score: state
                    .weight(&NodeId::Post(post_id), &label)
                    .map_or(MIN_SCORE, weight_to_score),
            })
        })
        .collect()
}
