//! Sort compiler
//!
//! `"state,population:desc"` becomes one clause per comma-separated
//! `field[:asc|desc]` token; any other token shape is rejected. Autocomplete fields sort on their `_<field>` shadow. Sorts on a
//! nested field carry the nested path, the predicate of the nested query on
//! that path (when there is one), and an explicit `mode` picking which
//! subdocument value orders the parent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::catalog::{FieldCatalog, FieldType};

use super::clause::{ClauseTree, NestedQuery};
use super::errors::{PlannerError, PlannerResult};
use super::options::NestedSortMode;

static SORT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+(?:\.\w+)*)(?::(\w+))?$").expect("sort token pattern"));

/// Nested part of a sort clause
#[derive(Debug, Clone, PartialEq)]
pub struct NestedSort {
    pub path: String,
    /// Same predicate the nested query uses on this path
    pub filter: Option<ClauseTree>,
    pub mode: &'static str,
}

/// One compiled sort clause
#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    /// Field sent to the engine (shadow field for autocomplete)
    pub field: String,
    pub descending: bool,
    pub nested: Option<NestedSort>,
}

impl SortClause {
    pub fn order(&self) -> &'static str {
        if self.descending {
            "desc"
        } else {
            "asc"
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("order".into(), json!(self.order()));
        if let Some(nested) = &self.nested {
            body.insert("nested_path".into(), json!(nested.path));
            if let Some(filter) = &nested.filter {
                body.insert("nested_filter".into(), filter.to_json());
            }
            body.insert("mode".into(), json!(nested.mode));
        }
        let mut clause = Map::new();
        clause.insert(self.field.clone(), Value::Object(body));
        Value::Object(clause)
    }
}

/// Compiles a sort specification against the nested queries already built.
pub fn compile_sort(
    spec: &str,
    catalog: &FieldCatalog,
    nested_queries: &[NestedQuery],
    mode: NestedSortMode,
) -> PlannerResult<Vec<SortClause>> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    let mut clauses = Vec::new();
    for token in spec.split(',').map(str::trim) {
        let caps = SORT_TOKEN.captures(token).ok_or_else(|| {
            PlannerError::invalid_sort(format!("Malformed sort token '{}' in '{}'", token, spec))
        })?;
        let field = &caps[1];
        let direction = caps.get(2).map_or("", |m| m.as_str());
        let descending = match direction.to_ascii_lowercase().as_str() {
            "" | "asc" => false,
            "desc" => true,
            other => {
                return Err(PlannerError::invalid_sort(format!(
                    "Unknown sort direction '{}' for '{}'",
                    other, field
                )))
            }
        };

        let nested = catalog.nested_path(field).map(|path| NestedSort {
            path: path.to_string(),
            filter: nested_queries
                .iter()
                .find(|q| q.path == path)
                .map(|q| q.predicate().clone()),
            mode: mode.resolve(descending),
        });

        let sort_field = if catalog.field_type(field) == FieldType::Autocomplete {
            format!("_{}", field)
        } else {
            field.to_string()
        };

        clauses.push(SortClause {
            field: sort_field,
            descending,
            nested,
        });
    }

    Ok(clauses)
}
