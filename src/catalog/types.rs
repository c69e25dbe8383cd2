//! Field catalog types
//!
//! Supported field types:
//! - string: analyzed text, equality via `match`
//! - integer / float: numeric, eligible for ranges and stats
//! - boolean
//! - literal: unanalyzed string
//! - name: prefix-wildcard search on a lowercase `_<field>` shadow
//! - autocomplete: `common` terms query, sorted on `_<field>`
//! - lat_lon: geo point used by distance filters

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::prefix::NestedPathIndex;

/// Operator suffixes a query parameter may carry after its field path
pub const OPERATOR_SUFFIXES: [&str; 3] = ["range", "not", "ne"];

/// Field used for distance filters when the catalog names none
pub const DEFAULT_LOCATION_FIELD: &str = "location";

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Literal,
    Name,
    Autocomplete,
    LatLon,
}

impl FieldType {
    /// Returns the type name as written in catalog files
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Literal => "literal",
            FieldType::Name => "name",
            FieldType::Autocomplete => "autocomplete",
            FieldType::LatLon => "lat_lon",
        }
    }

    /// Parses a catalog type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(FieldType::String),
            "integer" => Some(FieldType::Integer),
            "float" => Some(FieldType::Float),
            "boolean" => Some(FieldType::Boolean),
            "literal" => Some(FieldType::Literal),
            "name" => Some(FieldType::Name),
            "autocomplete" => Some(FieldType::Autocomplete),
            "lat_lon" => Some(FieldType::LatLon),
            _ => None,
        }
    }

    /// Numeric fields get `extended_stats` aggregations
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Strips a trailing `__range`, `__not` or `__ne` operator from a field path.
pub fn base_field(path: &str) -> &str {
    match path.rsplit_once("__") {
        Some((base, suffix)) if OPERATOR_SUFFIXES.contains(&suffix) && !base.is_empty() => base,
        _ => path,
    }
}

/// Read-only description of an index: field types, nested paths, and the
/// zip-code table used for distance filters.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    field_types: HashMap<String, FieldType>,
    nested: NestedPathIndex,
    locations: HashMap<String, GeoPoint>,
    location_field: Option<String>,
}

impl FieldCatalog {
    /// Create a catalog from its parts
    pub fn new(field_types: HashMap<String, FieldType>, nested: NestedPathIndex) -> Self {
        Self {
            field_types,
            nested,
            locations: HashMap::new(),
            location_field: None,
        }
    }

    /// Adds the zip-code table
    pub fn with_locations(mut self, locations: HashMap<String, GeoPoint>) -> Self {
        self.locations = locations;
        self
    }

    /// Overrides the geo field used for distance filters
    pub fn with_location_field(mut self, field: impl Into<String>) -> Self {
        self.location_field = Some(field.into());
        self
    }

    /// Declared type of a field (operator suffix ignored); unknown fields are strings.
    pub fn field_type(&self, path: &str) -> FieldType {
        self.declared_type(path).unwrap_or(FieldType::String)
    }

    /// Declared type without the string fallback
    pub fn declared_type(&self, path: &str) -> Option<FieldType> {
        self.field_types.get(base_field(path)).copied()
    }

    /// Nested path owning the field, if any
    pub fn nested_path(&self, path: &str) -> Option<&str> {
        self.nested.resolve(base_field(path))
    }

    pub fn is_nested(&self, path: &str) -> bool {
        self.nested_path(path).is_some()
    }

    pub fn nested_paths(&self) -> &[String] {
        self.nested.paths()
    }

    /// Looks up a zip code
    pub fn location(&self, zip: &str) -> Option<GeoPoint> {
        self.locations.get(zip.trim()).copied()
    }

    /// Geo field used for distance filters
    pub fn location_field(&self) -> &str {
        self.location_field
            .as_deref()
            .unwrap_or(DEFAULT_LOCATION_FIELD)
    }

    pub fn field_count(&self) -> usize {
        self.field_types.len()
    }
}
