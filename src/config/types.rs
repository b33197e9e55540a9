// src/config/types.rs
use serde::{Deserialize, Serialize};

use crate::graph::CollisionPolicy;
use crate::sink::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Worker threads for the rayon pool. `None` uses rayon's default.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: None,
            batch_size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize { DEFAULT_BATCH_SIZE }

/// Loader-side graph options. The algorithm constants are not configurable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub collision: CollisionPolicy,
    /// Derive follow edges between users who commented on the same post.
    #[serde(default)]
    pub co_comment_follows: bool,
    /// Invent low-weight likes and follows when the snapshot has no interactions.
    #[serde(default)]
    pub synthesize_placeholders: bool,
}
