//! Field Catalog subsystem
//!
//! Read-only description of the index being searched: the declared type of
//! each dotted field, the dotted prefixes stored as nested subdocument
//! arrays, and the zip-code table used by distance filters.
//!
//! # Design Principles
//!
//! - Immutable snapshots, shared by `Arc` across concurrent requests
//! - Reload swaps the whole snapshot, never mutates it in place
//! - Unknown fields are treated as `string` rather than rejected
//! - Longest dotted-prefix match decides a field's nested path

mod errors;
mod handle;
mod loader;
mod prefix;
mod types;

pub use errors::{CatalogError, CatalogResult};
pub use handle::CatalogHandle;
pub use loader::CatalogLoader;
pub use prefix::NestedPathIndex;
pub use types::{
    base_field, FieldCatalog, FieldType, GeoPoint, DEFAULT_LOCATION_FIELD, OPERATOR_SUFFIXES,
};
