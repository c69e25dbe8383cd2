//! Term classifier
//!
//! Splits request parameters into standard (top-level) parameters and
//! nested parameters grouped by nested path, normalizing values on the way:
//! comma-delimited `string`/`integer` values become lists, with bracket
//! characters trimmed and integer elements parsed (range values stay text).

use serde_json::Value;

use crate::catalog::{FieldCatalog, FieldType};

use super::ast::{Operator, ParamValue, QueryParameter, TermValue};
use super::errors::{PlannerError, PlannerResult};

/// A parameter with its type, operator and nested path resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedParam {
    /// Field path as given, suffix included
    pub field_path: String,
    /// Field path without the operator suffix
    pub field: String,
    pub operator: Option<Operator>,
    pub field_type: FieldType,
    pub nested_path: Option<String>,
    pub value: TermValue,
}

/// Classifier output; no parameter appears in both buckets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub standard: Vec<ClassifiedParam>,
    /// Grouped by path, in order of each path's first parameter
    pub nested: Vec<(String, Vec<ClassifiedParam>)>,
}

impl Classified {
    pub fn nested_param_count(&self) -> usize {
        self.nested.iter().map(|(_, params)| params.len()).sum()
    }
}

/// Classifies parameters against a catalog snapshot.
///
/// With `all_nested_as_standard` every parameter is standard, nested or not.
pub fn classify(
    params: &[QueryParameter],
    catalog: &FieldCatalog,
    all_nested_as_standard: bool,
) -> PlannerResult<Classified> {
    let mut out = Classified::default();

    for param in params {
        let (field, operator) = Operator::split(&param.field_path);
        let field_type = catalog.field_type(field);
        let nested_path = if all_nested_as_standard {
            None
        } else {
            catalog.nested_path(field).map(str::to_string)
        };

        let classified = ClassifiedParam {
            field_path: param.field_path.clone(),
            field: field.to_string(),
            operator,
            field_type,
            value: normalize(&param.field_path, &param.value, field_type, operator)?,
            nested_path: nested_path.clone(),
        };

        match nested_path {
            None => out.standard.push(classified),
            Some(path) => match out.nested.iter_mut().find(|(p, _)| *p == path) {
                Some((_, group)) => group.push(classified),
                None => out.nested.push((path, vec![classified])),
            },
        }
    }

    Ok(out)
}

fn normalize(
    field_path: &str,
    value: &ParamValue,
    field_type: FieldType,
    operator: Option<Operator>,
) -> PlannerResult<TermValue> {
    let splits = matches!(field_type, FieldType::String | FieldType::Integer);
    let parse_ints = field_type == FieldType::Integer && operator != Some(Operator::Range);

    let pieces: Vec<&str> = match value {
        ParamValue::Single(s) if splits && s.contains(',') => s.split(',').collect(),
        ParamValue::Single(s) => return Ok(TermValue::Scalar(Value::String(s.clone()))),
        ParamValue::List(values) => values.iter().map(String::as_str).collect(),
    };

    let mut elements = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let trimmed = if splits {
            piece.trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace())
        } else {
            piece
        };
        if parse_ints {
            let n: i64 = trimmed.parse().map_err(|_| {
                PlannerError::invalid_parameter(
                    field_path,
                    format!("'{}' is not an integer", trimmed),
                )
            })?;
            elements.push(Value::from(n));
        } else {
            elements.push(Value::String(trimmed.to_string()));
        }
    }
    Ok(TermValue::List(elements))
}
