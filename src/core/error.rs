//! Error types for world tree construction and export

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("no markers supplied")]
    EmptyInput,

    #[error("grid size must be positive and finite, got {0}")]
    InvalidGridSize(f64),

    #[error("marker {index} has a non-finite coordinate ({x}, {y}, {z})")]
    NonFiniteMarker { index: usize, x: f64, y: f64, z: f64 },

    #[error("cannot sample region {low:?} .. {high:?}: {reason}")]
    InvalidRegion { low: [f64; 3], high: [f64; 3], reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(String),

    #[error("malformed tree records: {0}")]
    MalformedRecords(String),
}
