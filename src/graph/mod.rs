// src/graph/mod.rs
pub mod builder;
pub mod weights;

pub use builder::{InteractionGraph, RawEdge, RawEdges};
pub use weights::{CollisionPolicy, WeightRow, WeightTable};
