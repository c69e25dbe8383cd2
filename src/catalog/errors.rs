//! Catalog error types
//!
//! Catalog errors only occur while loading or validating a catalog file.
//! Lookups never fail: unknown fields fall back to `string`.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while building a field catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON or has the wrong shape
    #[error("Malformed catalog {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// A field declares a type name outside the supported set
    #[error("Unknown field type '{type_name}' for field '{field}'")]
    UnknownFieldType { field: String, type_name: String },

    /// A nested path is empty or starts/ends with a dot
    #[error("Invalid nested path '{0}'")]
    InvalidNestedPath(String),

    /// The same nested path is declared twice
    #[error("Duplicate nested path '{0}'")]
    DuplicateNestedPath(String),
}

impl CatalogError {
    /// Create a malformed-catalog error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
