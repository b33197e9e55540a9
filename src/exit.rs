// src/exit.rs
//! Standardized process exit codes for `feedrank`.
//!
//! Provides a stable contract for the scheduler that launches ranking runs.

use std::process::Termination;

use crate::error::RankError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FeedRankExit {
    /// Run completed and scores were written.
    Success = 0,
    /// Generic error (e.g. IO, thread pool).
    Error = 1,
    /// Input validation failed (malformed edge, bad snapshot, bad config).
    InvalidInput = 2,
}

impl FeedRankExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Classifies a failed run.
    #[must_use]
    pub fn from_error(e: &anyhow::Error) -> Self {
        match e.downcast_ref::<RankError>() {
            Some(rank) if rank.is_input_error() => Self::InvalidInput,
            _ => Self::Error,
        }
    }
}

impl Termination for FeedRankExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
