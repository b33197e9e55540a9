// src/config/mod.rs
pub mod types;

pub use self::types::{Config, GraphConfig, RunConfig};

use std::fs;
use std::path::Path;

use crate::error::{RankError, Result};

/// File picked up from the working directory when no `--config` is given.
pub const LOCAL_CONFIG: &str = "feedrank.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses an explicit config file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RankError::io(e, path))?;
        Self::parse_toml(&content)
    }

    /// Loads `feedrank.toml` from the working directory, or defaults if absent.
    ///
    /// # Errors
    /// Returns error if the file exists but is invalid.
    pub fn load_local() -> Result<Self> {
        let path = Path::new(LOCAL_CONFIG);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// # Errors
    /// Returns error on malformed TOML or unknown enum values.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the worker pool the run executes on.
    ///
    /// # Errors
    /// Returns error if rayon cannot start the pool.
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.run.threads.unwrap_or(0))
            .build()?)
    }
}
