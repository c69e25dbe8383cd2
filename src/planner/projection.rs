//! Projection planner
//!
//! Decides how requested fields come back: through `_source`, through the
//! `fields` retrieval channel, or from inner hits. The decoder reads the
//! response back with the same plan.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::catalog::FieldCatalog;

/// Source pattern that drops engine-internal fields
pub const INTERNAL_FIELDS_PATTERN: &str = "_*";

/// `_source` request mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    /// Whole document minus matching patterns
    Exclude(Vec<String>),
    /// Only these fields
    Include(Vec<String>),
    Disabled,
}

impl SourceMode {
    pub fn to_json(&self) -> Value {
        match self {
            SourceMode::Exclude(patterns) => json!({ "exclude": patterns }),
            SourceMode::Include(fields) => json!(fields),
            SourceMode::Disabled => Value::Bool(false),
        }
    }

    pub fn is_whole_document(&self) -> bool {
        matches!(self, SourceMode::Exclude(_))
    }
}

/// How requested fields are fetched and read back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionPlan {
    pub source_mode: SourceMode,
    /// All requested fields, in request order
    pub requested_fields: Vec<String>,
    /// Non-nested requested fields, sent as the `fields` list
    pub retrieval_fields: Vec<String>,
    /// Nested path -> inner-hit keys to keep (relative to the path).
    /// An empty list keeps every key.
    pub nested_projection: BTreeMap<String, Vec<String>>,
}

impl ProjectionPlan {
    /// Plans the projection.
    ///
    /// `nested_active` is true when at least one nested query is part of the
    /// compiled clause; `flatten_nested` is the caller's opt-in to read
    /// nested data from `_source` instead of inner hits.
    pub fn build(
        requested: &[String],
        catalog: &FieldCatalog,
        nested_active: bool,
        flatten_nested: bool,
    ) -> Self {
        let (nested_fields, retrieval_fields): (Vec<String>, Vec<String>) = requested
            .iter()
            .cloned()
            .partition(|field| catalog.is_nested(field));

        let source_mode = if nested_active {
            if flatten_nested && !nested_fields.is_empty() {
                SourceMode::Include(nested_fields.clone())
            } else {
                SourceMode::Disabled
            }
        } else if requested.is_empty() {
            SourceMode::Exclude(vec![INTERNAL_FIELDS_PATTERN.to_string()])
        } else if nested_fields.is_empty() {
            SourceMode::Disabled
        } else {
            SourceMode::Include(nested_fields.clone())
        };

        let mut nested_projection: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if nested_active && !flatten_nested {
            for field in &nested_fields {
                if let Some(path) = catalog.nested_path(field) {
                    let keys = nested_projection.entry(path.to_string()).or_default();
                    if let Some(rest) = field.strip_prefix(path).and_then(|r| r.strip_prefix('.')) {
                        keys.push(rest.to_string());
                    }
                }
            }
        }

        Self {
            source_mode,
            requested_fields: requested.to_vec(),
            retrieval_fields,
            nested_projection,
        }
    }

    /// Inner-hit keys to keep for a path; `None` keeps all.
    pub fn nested_filter(&self, path: &str) -> Option<&[String]> {
        self.nested_projection
            .get(path)
            .filter(|keys| !keys.is_empty())
            .map(Vec::as_slice)
    }
}
