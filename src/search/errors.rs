//! Search facade errors

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::decoder::DecodeError;
use crate::planner::PlannerError;

/// Result type for facade operations
pub type SearchResultOf<T> = Result<T, SearchError>;

/// Errors raised by a search client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The engine could not be reached
    #[error("Search engine unavailable: {0}")]
    Unavailable(String),

    /// The engine answered with something other than a search response
    #[error("Unexpected engine reply: {0}")]
    UnexpectedReply(String),
}

/// Errors raised anywhere in the compile, execute, decode pipeline
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Planner(#[from] PlannerError),

    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),
}

impl SearchError {
    /// Whether the caller's request was at fault
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, SearchError::Planner(_))
    }
}
