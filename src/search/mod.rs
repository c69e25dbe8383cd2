//! Search facade
//!
//! Ties the compiler, an engine client and the decoder together. The engine
//! is reached only through [`SearchClient`], so everything here runs
//! without one in tests and in the CLI.

mod client;
mod errors;
mod service;

pub use client::{EngineRequest, SearchClient, StaticClient};
pub use errors::{ClientError, SearchError, SearchResultOf};
pub use service::{SearchService, DEFAULT_INDEX};
