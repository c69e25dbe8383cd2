//! # REST API Errors
//!
//! Error types for the HTTP compile/decode service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::decoder::DecodeError;
use crate::planner::PlannerError;
use crate::search::{ClientError, SearchError};

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Parameters or options the compiler rejected
    #[error("{0}")]
    InvalidRequest(#[from] PlannerError),

    /// Engine response supplied for decoding is unreadable
    #[error("{0}")]
    InvalidResponse(#[from] DecodeError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Search client failure
    #[error("{0}")]
    Client(#[from] ClientError),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            RestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidResponse(_) => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            RestError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable compiler error code, when the compiler rejected the request
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            RestError::InvalidRequest(err) => Some(err.code().code()),
            _ => None,
        }
    }
}

impl From<SearchError> for RestError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Planner(e) => RestError::InvalidRequest(e),
            SearchError::Decode(e) => RestError::InvalidResponse(e),
            SearchError::Client(e) => RestError::Client(e),
            SearchError::Catalog(e) => RestError::Catalog(e),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error_code: err.error_code(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::from(PlannerError::invalid_sort("bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::from(DecodeError::EngineError("boom".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::from(CatalogError::InvalidNestedPath(".x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_carries_compiler_code() {
        let body = ErrorResponse::from(RestError::from(PlannerError::unknown_location("99999")));
        assert_eq!(body.code, 400);
        assert_eq!(body.error_code, Some("SEARCH_UNKNOWN_LOCATION"));

        let body = ErrorResponse::from(RestError::from(ClientError::Unavailable("down".into())));
        assert_eq!(body.code, 500);
        assert!(body.error_code.is_none());
    }

    #[test]
    fn test_search_error_mapping() {
        let err: SearchError = PlannerError::invalid_sort("bad").into();
        assert!(matches!(RestError::from(err), RestError::InvalidRequest(_)));
    }
}
