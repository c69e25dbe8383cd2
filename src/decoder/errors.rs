//! Decoder error types
//!
//! Only an unreadable response fails decoding. Unexpected structure inside
//! a readable response degrades instead: missing fields become null and
//! unknown inner hits are skipped.

use thiserror::Error;

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while reading an engine response
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Response does not match the engine's search-response schema
    #[error("Malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Engine reported a failed search
    #[error("Search engine error: {0}")]
    EngineError(String),
}
