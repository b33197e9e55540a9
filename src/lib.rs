// src/lib.rs
//! Adsorption-based feed ranking.
//!
//! Per-user trust labels are propagated across the user/post interaction
//! graph until the distribution settles; the label weights that reach each
//! post become that user's recommendation score for it.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod exit;
pub mod export;
pub mod graph;
pub mod pipeline;
pub mod propagation;
pub mod sink;
pub mod snapshot;
pub mod types;

pub use error::{RankError, Result};
pub use pipeline::{Pipeline, RankInput, RankOutput};
