//! # URL surface
//!
//! Parses URL query strings into search requests and serves the
//! compile/decode pipeline over HTTP.

pub mod errors;
pub mod parser;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use parser::{parse_pairs, parse_query_string};
pub use server::{DecodeRequest, HealthResponse, RestServer};
