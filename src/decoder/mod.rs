//! Response Decoder subsystem
//!
//! Rebuilds flat (or hierarchical) result documents from the engine's
//! nested response, using the `QueryPlan` the request was compiled with.
//!
//! # Design Principles
//!
//! - Pure: decoding the same response twice yields the same documents
//! - Missing requested fields become explicit nulls
//! - Nested-typed values always stay arrays
//! - Unexpected structure degrades instead of failing

mod decoder;
mod errors;
mod flatten;
mod raw;
mod result;

pub use decoder::{DecodeStats, ResponseDecoder};
pub use errors::{DecodeError, DecodeResult};
pub use flatten::{flatten_dotted, nest_dotted};
pub use raw::{RawHit, RawHits, RawInnerHits, RawResponse, RawTotal};
pub use result::{Metadata, ResultDocument, SearchResult};
