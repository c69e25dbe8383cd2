//! Catalog loader
//!
//! Reads a JSON catalog file:
//!
//! ```json
//! {
//!   "field_types": { "id": "integer", "school.name": "name" },
//!   "nested": ["latest.programs"],
//!   "locations": { "94103": { "lat": 37.77, "lon": -122.41 } },
//!   "location_field": "location"
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::errors::{CatalogError, CatalogResult};
use super::prefix::NestedPathIndex;
use super::types::{FieldCatalog, FieldType, GeoPoint};

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    field_types: HashMap<String, String>,
    #[serde(default)]
    nested: Vec<String>,
    #[serde(default)]
    locations: HashMap<String, GeoPoint>,
    #[serde(default)]
    location_field: Option<String>,
}

/// Builds [`FieldCatalog`] snapshots from files or strings.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Loads and validates a catalog file.
    pub fn load(path: &Path) -> CatalogResult<FieldCatalog> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses catalog JSON; `origin` only labels error messages.
    pub fn parse(content: &str, origin: &str) -> CatalogResult<FieldCatalog> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| CatalogError::malformed(origin, format!("Invalid JSON: {}", e)))?;

        let mut field_types = HashMap::with_capacity(file.field_types.len());
        for (field, type_name) in file.field_types {
            let ty = FieldType::from_name(&type_name).ok_or_else(|| {
                CatalogError::UnknownFieldType {
                    field: field.clone(),
                    type_name: type_name.clone(),
                }
            })?;
            field_types.insert(field, ty);
        }

        let nested = NestedPathIndex::new(file.nested)?;

        let mut catalog = FieldCatalog::new(field_types, nested).with_locations(file.locations);
        if let Some(field) = file.location_field {
            catalog = catalog.with_location_field(field);
        }

        tracing::debug!(
            origin,
            fields = catalog.field_count(),
            nested_paths = catalog.nested_paths().len(),
            "catalog parsed"
        );

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "field_types": {
            "id": "integer",
            "school.name": "name",
            "latest.programs.credential.level": "integer"
        },
        "nested": ["latest.programs"],
        "locations": { "94103": { "lat": 37.77, "lon": -122.41 } }
    }"#;

    #[test]
    fn test_parse_sample() {
        let catalog = CatalogLoader::parse(SAMPLE, "<test>").unwrap();
        assert_eq!(catalog.field_type("id"), FieldType::Integer);
        assert_eq!(catalog.field_type("school.name"), FieldType::Name);
        assert_eq!(
            catalog.nested_path("latest.programs.credential.level"),
            Some("latest.programs")
        );
        assert!(catalog.location("94103").is_some());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = CatalogLoader::parse(r#"{"field_types": {"x": "bigint"}}"#, "<test>")
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownFieldType { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = CatalogLoader::parse("{not json", "<test>").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[test]
    fn test_empty_object_is_valid() {
        let catalog = CatalogLoader::parse("{}", "<test>").unwrap();
        assert_eq!(catalog.field_count(), 0);
        assert!(catalog.nested_paths().is_empty());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = CatalogLoader::load(file.path()).unwrap();
        assert_eq!(catalog.field_count(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = CatalogLoader::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
