use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod report;
pub mod workload;

pub use report::{BucketReport, BucketStats, EngineTotals, PageReport, Report, Summary};
pub use workload::{Concurrency, Engine, Page, RunOptions, TimerKind, Workload};

/// Default number of full passes through the page mixture per concurrency slot.
pub const DEFAULT_ITERATIONS: u32 = 9;

/// Settling delay per concurrency slot on platforms that run out of sockets
/// when connections are recycled too quickly.
pub const WINDOWS_SETTLE_MS_PER_SLOT: u64 = 2_000;

/// Error types for benchmark operations
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Calibration failed for {url}: {reason}")]
    Calibration { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Expected {expected} bytes, got {actual} bytes")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("No samples recorded")]
    NoData,
}

impl BenchError {
    /// Fatal errors abort a whole multi-level run; everything else is recorded
    /// against a single task and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BenchError::Configuration(_) | BenchError::Calibration { .. })
    }
}

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;
