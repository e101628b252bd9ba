//! Error taxonomy shared by the frequency map, scanners and corpus runner
//!
//! Per-file errors (`Read`, `EngineOutOfResources`) are reported to the
//! caller, which decides whether the remaining files still run. The rest
//! abort the whole run.

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building frequency tables
#[derive(Error, Debug)]
pub enum FreqError {
    #[error("memory allocation failed while reserving {requested} slots")]
    AllocationFailure {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("pattern engine ran out of resources for '{pattern}'")]
    EngineOutOfResources { pattern: String },

    #[error("window size must be at least one word, got {0}")]
    InvalidWordCount(usize),

    #[error("frequency map was cleared and must be re-initialized before use")]
    Uninitialized,
}

impl FreqError {
    /// Wrap a failed `try_reserve` call
    pub(crate) fn allocation(requested: usize, source: TryReserveError) -> Self {
        FreqError::AllocationFailure { requested, source }
    }

    /// Whether the corpus runner may skip the offending file and carry on
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            FreqError::Read { .. } | FreqError::EngineOutOfResources { .. }
        )
    }
}

/// Result type for frequency table operations
pub type Result<T> = std::result::Result<T, FreqError>;
