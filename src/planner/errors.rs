//! Compiler error types
//!
//! Error codes:
//! - SEARCH_INVALID_PARAMETER (REJECT)
//! - SEARCH_AMBIGUOUS_NESTED_PATH (REJECT)
//! - SEARCH_INVALID_SORT (REJECT)
//! - SEARCH_UNKNOWN_LOCATION (REJECT)
//!
//! All compiler errors fail the request before anything is sent to the
//! search engine.

use std::fmt;

/// Severity levels for compiler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Compiler error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Value cannot be parsed for the field's declared type
    InvalidParameter,
    /// Terms of one nested group resolve to different nested paths
    AmbiguousNestedPath,
    /// Malformed sort specification
    InvalidSort,
    /// Distance filter without a known zip code
    UnknownLocation,
}

impl PlannerErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::InvalidParameter => "SEARCH_INVALID_PARAMETER",
            PlannerErrorCode::AmbiguousNestedPath => "SEARCH_AMBIGUOUS_NESTED_PATH",
            PlannerErrorCode::InvalidSort => "SEARCH_INVALID_SORT",
            PlannerErrorCode::UnknownLocation => "SEARCH_UNKNOWN_LOCATION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compiler error with full context
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Offending field if applicable
    field: Option<String>,
}

impl PlannerError {
    /// Create an invalid parameter error naming the field
    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: PlannerErrorCode::InvalidParameter,
            message: format!("Invalid value for '{}': {}", f, reason.into()),
            field: Some(f),
        }
    }

    /// Create an invalid option error (paging and similar, no field)
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::InvalidParameter,
            message: format!("Invalid option '{}': {}", name.into(), reason.into()),
            field: None,
        }
    }

    /// Create an ambiguous nested path error
    pub fn ambiguous_nested_path(
        field: impl Into<String>,
        expected: &str,
        found: &str,
    ) -> Self {
        let f = field.into();
        Self {
            code: PlannerErrorCode::AmbiguousNestedPath,
            message: format!(
                "Field '{}' belongs to nested path '{}', not '{}'",
                f, found, expected
            ),
            field: Some(f),
        }
    }

    /// Create an invalid sort error
    pub fn invalid_sort(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::InvalidSort,
            message: reason.into(),
            field: None,
        }
    }

    /// Create an unknown location error
    pub fn unknown_location(zip: impl Into<String>) -> Self {
        let zip = zip.into();
        let message = if zip.is_empty() {
            "Distance filter requires a zip code".to_string()
        } else {
            format!("Unknown zip code '{}'", zip)
        };
        Self {
            code: PlannerErrorCode::UnknownLocation,
            message,
            field: Some("zip".into()),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for PlannerError {}

/// Result type for compiler operations
pub type PlannerResult<T> = Result<T, PlannerError>;
