//! Standard clause builder
//!
//! Term shape precedence for a top-level parameter:
//!
//! 1. `name` field: prefix wildcard on every word
//! 2. `autocomplete` field: common-terms query
//! 3. `__range`: OR of intervals; `__ne`/`__not`: negated equality
//! 4. list value: terms
//! 5. otherwise: match
//!
//! A distance option adds a geo term independent of the parameters.

use crate::catalog::{FieldCatalog, FieldType};

use super::ast::{Operator, QueryTerm, RangeBound, TermValue};
use super::classifier::ClassifiedParam;
use super::clause::{BoolClause, ClauseTree, Slot};
use super::errors::{PlannerError, PlannerResult};
use super::options::SearchOptions;

/// Builds the term for a top-level parameter.
pub fn standard_term(param: &ClassifiedParam) -> PlannerResult<QueryTerm> {
    match param.field_type {
        FieldType::Name => {
            let text = param.value.texts().join(" ");
            let pattern = text
                .split_whitespace()
                .map(|word| format!("{}*", word))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            Ok(QueryTerm::NameWildcard {
                field: param.field.clone(),
                pattern,
            })
        }
        FieldType::Autocomplete => Ok(QueryTerm::Autocomplete {
            field: param.field.clone(),
            query: param.value.texts().join(" "),
        }),
        _ => field_term(param),
    }
}

/// Shape shared by standard and nested terms: range, negation, terms, match.
pub(super) fn field_term(param: &ClassifiedParam) -> PlannerResult<QueryTerm> {
    match param.operator {
        Some(Operator::Range) => {
            let mut bounds = Vec::new();
            for text in param.value.texts() {
                for piece in text.split(',').filter(|p| !p.trim().is_empty()) {
                    bounds.push(RangeBound::parse(&param.field_path, piece)?);
                }
            }
            if bounds.is_empty() {
                return Err(PlannerError::invalid_parameter(
                    &param.field_path,
                    "empty range",
                ));
            }
            Ok(QueryTerm::Range {
                field: param.field.clone(),
                bounds,
            })
        }
        Some(Operator::Not) | Some(Operator::Ne) => {
            Ok(QueryTerm::negate(equality_term(&param.field, &param.value)))
        }
        None => Ok(equality_term(&param.field, &param.value)),
    }
}

fn equality_term(field: &str, value: &TermValue) -> QueryTerm {
    match value {
        TermValue::Scalar(v) => QueryTerm::match_value(field, v.clone()),
        TermValue::List(values) => QueryTerm::terms(field, values.clone()),
    }
}

/// Geo term from `zip` + `distance`; `None` unless distance is non-empty.
pub fn geo_term(options: &SearchOptions, catalog: &FieldCatalog) -> PlannerResult<Option<QueryTerm>> {
    let distance = match options.distance.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d,
        _ => return Ok(None),
    };

    let zip = options.zip.as_deref().unwrap_or("").trim();
    let point = catalog
        .location(zip)
        .ok_or_else(|| PlannerError::unknown_location(zip))?;

    let distance = if distance.ends_with("km") || distance.ends_with("mi") {
        distance.to_string()
    } else {
        format!("{}mi", distance)
    };

    Ok(Some(QueryTerm::GeoDistance {
        field: catalog.location_field().to_string(),
        point,
        distance,
    }))
}

/// Renders one term as a leaf clause. Negations render their inner term.
pub(super) fn leaf(term: &QueryTerm) -> ClauseTree {
    match term {
        QueryTerm::Match { field, value } => ClauseTree::Match {
            field: field.clone(),
            value: value.clone(),
        },
        QueryTerm::Terms { field, values } => ClauseTree::Terms {
            field: field.clone(),
            values: values.clone(),
        },
        QueryTerm::Range { field, bounds } => ClauseTree::Or(range_leaves(field, bounds)),
        QueryTerm::Negation(inner) => leaf(inner),
        QueryTerm::NameWildcard { field, pattern } => ClauseTree::Wildcard {
            field: format!("_{}", field),
            value: pattern.clone(),
        },
        QueryTerm::Autocomplete { field, query } => ClauseTree::Common {
            field: field.clone(),
            query: query.clone(),
        },
        QueryTerm::GeoDistance {
            field,
            point,
            distance,
        } => ClauseTree::GeoDistance {
            field: field.clone(),
            distance: distance.clone(),
            point: *point,
        },
    }
}

pub(super) fn range_leaves(field: &str, bounds: &[RangeBound]) -> Vec<ClauseTree> {
    bounds
        .iter()
        .map(|bound| ClauseTree::Range {
            field: field.to_string(),
            bound: bound.clone(),
        })
        .collect()
}

/// Combines standard terms conjunctively.
///
/// No terms gives `match_all`. A single term stays a leaf, except negation
/// (`bool.must_not`) and geo (`bool.filter`). Several terms become a bool
/// with wildcard/common terms in `must`, negations in `must_not` and
/// everything else in `filter`.
pub fn standard_clause(terms: &[QueryTerm]) -> ClauseTree {
    match terms {
        [] => ClauseTree::MatchAll,
        [QueryTerm::Negation(inner)] => {
            ClauseTree::Bool(BoolClause::must_not(Slot::many(vec![leaf(inner)])))
        }
        [geo @ QueryTerm::GeoDistance { .. }] => {
            ClauseTree::Bool(BoolClause::filter(Slot::one(leaf(geo))))
        }
        [single] => leaf(single),
        _ => {
            let mut must = Vec::new();
            let mut filter = Vec::new();
            let mut must_not = Vec::new();
            for term in terms {
                match term {
                    QueryTerm::NameWildcard { .. } | QueryTerm::Autocomplete { .. } => {
                        must.push(leaf(term))
                    }
                    QueryTerm::Negation(inner) => must_not.push(leaf(inner)),
                    _ => filter.push(leaf(term)),
                }
            }
            ClauseTree::Bool(BoolClause {
                must: Slot::from_vec(must),
                filter: Slot::from_vec(filter),
                must_not: Slot::many(must_not),
            })
        }
    }
}

/// Builds all standard terms, geo last.
pub fn build_standard_terms(
    params: &[ClassifiedParam],
    options: &SearchOptions,
    catalog: &FieldCatalog,
) -> PlannerResult<Vec<QueryTerm>> {
    let mut terms = params
        .iter()
        .map(standard_term)
        .collect::<PlannerResult<Vec<_>>>()?;
    if let Some(geo) = geo_term(options, catalog)? {
        terms.push(geo);
    }
    Ok(terms)
}
