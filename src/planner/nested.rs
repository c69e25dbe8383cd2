//! Nested clause builder
//!
//! One nested query per nested path. Shape of the predicate, by group:
//!
//! | Group terms                                   | Predicate                         |
//! |-----------------------------------------------|-----------------------------------|
//! | one terms/range term                          | `filter: <leaf>`                  |
//! | only scalar negations                         | `query: bool{must_not: [match..]}`|
//! | mixed kinds, or any terms/range/negated list  | `query: bool{filter: [...]}`      |
//! | only equality                                 | `query: bool{must: [match..]}`    |
//!
//! Inside `bool.filter`, contiguous equality terms are grouped as
//! `bool{must}` and contiguous negations as `bool{must_not}`; ranges and
//! terms contribute raw leaves.

use std::collections::HashSet;

use crate::catalog::FieldCatalog;

use super::ast::{NestedGroup, QueryTerm};
use super::classifier::ClassifiedParam;
use super::clause::{BoolClause, ClauseTree, NestedContext, NestedQuery, Slot};
use super::errors::PlannerResult;
use super::standard::{field_term, leaf, range_leaves};

/// Builds the group for one nested path. `name`/`autocomplete` fields
/// compile as plain equality inside nested paths.
///
/// The classifier only hands over parameters already grouped by path, so
/// `AmbiguousNestedPath` is unreachable through `QueryPlanner::plan`; any
/// other caller mixing paths gets it here.
pub fn build_group(
    path: &str,
    params: &[ClassifiedParam],
    catalog: &FieldCatalog,
) -> PlannerResult<NestedGroup> {
    let mut group = NestedGroup::new(path);
    for param in params {
        let term_path = catalog.nested_path(&param.field).unwrap_or_default();
        group.push(term_path, field_term(param)?)?;
    }
    Ok(group)
}

/// Compiles a group into its nested query
pub fn nested_query(group: &NestedGroup) -> NestedQuery {
    NestedQuery::new(group.path(), nested_context(group.terms()))
}

fn nested_context(terms: &[QueryTerm]) -> NestedContext {
    if let [single] = terms {
        if single.is_filter_context() && !single.is_negation() {
            return NestedContext::Filter(filter_leaf(single));
        }
    }

    let kinds: HashSet<_> = terms.iter().map(QueryTerm::kind).collect();
    let any_filter_context = terms.iter().any(QueryTerm::is_filter_context);

    if !any_filter_context && terms.iter().all(QueryTerm::is_negation) {
        let negated = terms.iter().map(leaf).collect();
        return NestedContext::Query(ClauseTree::Bool(BoolClause::must_not(Slot::many(negated))));
    }

    if any_filter_context || kinds.len() > 1 {
        return NestedContext::Query(ClauseTree::Bool(BoolClause::filter(Slot::many(
            filter_items(terms),
        ))));
    }

    let matches = terms.iter().map(leaf).collect();
    NestedContext::Query(ClauseTree::Bool(BoolClause::must(Slot::many(matches))))
}

/// Terms and ranges as raw leaves; several intervals become an `or`.
fn filter_leaf(term: &QueryTerm) -> ClauseTree {
    match term {
        QueryTerm::Range { field, bounds } => {
            let mut leaves = range_leaves(field, bounds);
            if leaves.len() == 1 {
                leaves.remove(0)
            } else {
                ClauseTree::Or(leaves)
            }
        }
        other => leaf(other),
    }
}

#[derive(PartialEq)]
enum Run {
    None,
    Must,
    MustNot,
}

fn filter_items(terms: &[QueryTerm]) -> Vec<ClauseTree> {
    let mut items = Vec::new();
    let mut pending = Vec::new();
    let mut run = Run::None;

    fn flush(items: &mut Vec<ClauseTree>, pending: &mut Vec<ClauseTree>, run: &Run) {
        if pending.is_empty() {
            return;
        }
        let slot = Slot::many(std::mem::take(pending));
        items.push(ClauseTree::Bool(match run {
            Run::MustNot => BoolClause::must_not(slot),
            _ => BoolClause::must(slot),
        }));
    }

    for term in terms {
        let next = match term {
            QueryTerm::Match { .. } => Run::Must,
            QueryTerm::Negation(_) => Run::MustNot,
            _ => Run::None,
        };
        if next != run {
            flush(&mut items, &mut pending, &run);
            run = next;
        }
        match run {
            Run::None => items.push(filter_leaf(term)),
            _ => pending.push(leaf(term)),
        }
    }
    flush(&mut items, &mut pending, &run);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldType, NestedPathIndex};
    use crate::planner::ast::{QueryParameter, RangeBound};
    use crate::planner::classifier::classify;
    use crate::planner::PlannerErrorCode;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn catalog() -> FieldCatalog {
        let mut types = HashMap::new();
        types.insert("programs.credential.level".to_string(), FieldType::Integer);
        types.insert("programs.earnings".to_string(), FieldType::Float);
        types.insert("programs.title".to_string(), FieldType::Name);
        FieldCatalog::new(types, NestedPathIndex::new(["programs"]).unwrap())
    }

    fn compile(params: &[(&str, &str)]) -> Value {
        let catalog = catalog();
        let params: Vec<_> = params
            .iter()
            .map(|(k, v)| QueryParameter::new(*k, *v))
            .collect();
        let classified = classify(&params, &catalog, false).unwrap();
        let (path, group_params) = &classified.nested[0];
        let group = build_group(path, group_params, &catalog).unwrap();
        nested_query(&group).to_json()
    }

    #[test]
    fn test_mixed_path_group_rejected() {
        let catalog = FieldCatalog::new(
            HashMap::new(),
            NestedPathIndex::new(["programs", "owners"]).unwrap(),
        );
        let params = vec![
            QueryParameter::new("programs.code", "13"),
            QueryParameter::new("owners.kind", "public"),
        ];
        let classified = classify(&params, &catalog, false).unwrap();
        assert_eq!(classified.nested.len(), 2);
        let mixed: Vec<_> = classified
            .nested
            .iter()
            .flat_map(|(_, group)| group.iter().cloned())
            .collect();

        let err = build_group("programs", &mixed, &catalog).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::AmbiguousNestedPath);
        assert_eq!(err.field(), Some("owners.kind"));
    }

    #[test]
    fn test_single_terms_goes_to_filter() {
        let q = compile(&[("programs.credential.level", "[2,3,5]")]);
        assert_eq!(
            q["nested"]["filter"],
            json!({"terms": {"programs.credential.level": [2, 3, 5]}})
        );
        assert!(q["nested"].get("query").is_none());
        assert_eq!(q["nested"]["inner_hits"], json!({"size": 100}));
    }

    #[test]
    fn test_single_range_goes_to_filter() {
        let q = compile(&[("programs.earnings__range", "1000..")]);
        assert_eq!(
            q["nested"]["filter"],
            json!({"range": {"programs.earnings": {"gte": 1000}}})
        );

        let q = compile(&[("programs.credential.level__range", "1..2,4..")]);
        assert_eq!(
            q["nested"]["filter"],
            json!({"or": [
                {"range": {"programs.credential.level": {"gte": 1, "lte": 2}}},
                {"range": {"programs.credential.level": {"gte": 4}}}
            ]})
        );
    }

    #[test]
    fn test_all_match_is_bool_must() {
        let q = compile(&[("programs.code", "1312"), ("programs.title", "Nursing")]);
        assert_eq!(
            q["nested"]["query"],
            json!({"bool": {"must": [
                {"match": {"programs.code": "1312"}},
                {"match": {"programs.title": "Nursing"}}
            ]}})
        );
        assert_eq!(q["nested"]["path"], json!("programs"));
    }

    #[test]
    fn test_scalar_negations_are_must_not() {
        let q = compile(&[("programs.code__not", "1312")]);
        assert_eq!(
            q["nested"]["query"],
            json!({"bool": {"must_not": [{"match": {"programs.code": "1312"}}]}})
        );
    }

    #[test]
    fn test_negated_list_goes_through_filter() {
        let q = compile(&[("programs.credential.level__not", "2,3")]);
        assert_eq!(
            q["nested"]["query"],
            json!({"bool": {"filter": [
                {"bool": {"must_not": [{"terms": {"programs.credential.level": [2, 3]}}]}}
            ]}})
        );
    }

    #[test]
    fn test_mixed_groups_contiguous_runs() {
        let q = compile(&[
            ("programs.code", "13"),
            ("programs.title", "Nursing"),
            ("programs.credential.level", "2,3"),
            ("programs.code__ne", "99"),
            ("programs.earnings__range", "10..20"),
        ]);
        assert_eq!(
            q["nested"]["query"],
            json!({"bool": {"filter": [
                {"bool": {"must": [
                    {"match": {"programs.code": "13"}},
                    {"match": {"programs.title": "Nursing"}}
                ]}},
                {"terms": {"programs.credential.level": [2, 3]}},
                {"bool": {"must_not": [{"match": {"programs.code": "99"}}]}},
                {"range": {"programs.earnings": {"gte": 10, "lte": 20}}}
            ]}})
        );
    }

    #[test]
    fn test_match_plus_scalar_negation_is_mixed() {
        let q = compile(&[("programs.code", "13"), ("programs.code__not", "14")]);
        assert_eq!(
            q["nested"]["query"],
            json!({"bool": {"filter": [
                {"bool": {"must": [{"match": {"programs.code": "13"}}]}},
                {"bool": {"must_not": [{"match": {"programs.code": "14"}}]}}
            ]}})
        );
    }

    #[test]
    fn test_predicate_is_reusable() {
        let mut group = NestedGroup::new("programs");
        group
            .push(
                "programs",
                QueryTerm::Range {
                    field: "programs.earnings".into(),
                    bounds: vec![RangeBound::parse("programs.earnings", "5..").unwrap()],
                },
            )
            .unwrap();
        let query = nested_query(&group);
        assert_eq!(
            query.predicate().to_json(),
            json!({"range": {"programs.earnings": {"gte": 5}}})
        );
    }
}
