//! Error types for retrolens

use thiserror::Error;

/// Errors that can occur on the outer JSON-facing surface.
///
/// The categorization core itself never fails: missing input produces an
/// empty dataset, malformed schedules produce logged sentinel lookups, and
/// degenerate buckets are skipped. Only parsing and encoding can error.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
