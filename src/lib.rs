//! nestsearch - compiles flat URL-style search parameters into nested-aware
//! search-engine queries and decodes the responses back into flat documents.
//!
//! - `catalog`: field types and nested paths
//! - `planner`: parameters + options into a compiled request
//! - `decoder`: engine response into result documents
//! - `search`: compile, execute, decode through a client
//! - `rest_api`: query-string parsing and the HTTP service
//! - `cli`: command-line entry points

pub mod catalog;
pub mod cli;
pub mod decoder;
pub mod observability;
pub mod planner;
pub mod rest_api;
pub mod search;
