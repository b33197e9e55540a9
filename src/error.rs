// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::types::EdgeKind;

#[derive(Debug, Error)]
pub enum RankError {
    #[error("Malformed {kind} edge '{raw}': {reason}")]
    MalformedEdge {
        kind: EdgeKind,
        raw: String,
        reason: String,
    },

    #[error("Invalid node identifier '{0}'")]
    InvalidNode(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, RankError>;

impl RankError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        RankError::Io {
            source,
            path: path.into(),
        }
    }

    /// True when the error came from bad input data rather than the environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RankError::MalformedEdge { .. }
                | RankError::InvalidNode(_)
                | RankError::Json(_)
                | RankError::Config(_)
        )
    }
}

// Allow `?` on std::io::Error by converting to RankError::Io with unknown path.
impl From<std::io::Error> for RankError {
    fn from(source: std::io::Error) -> Self {
        RankError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<toml::de::Error> for RankError {
    fn from(e: toml::de::Error) -> Self {
        RankError::Config(e.to_string())
    }
}
