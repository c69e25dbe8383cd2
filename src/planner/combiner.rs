//! Clause combiner
//!
//! Splices nested queries into the standard clause. The strategy is chosen
//! by the shape of the standard clause:
//!
//! | Standard shape | Combined clause                                                |
//! |----------------|----------------------------------------------------------------|
//! | (no nested)    | standard clause unchanged                                      |
//! | `match_all`    | `bool{filter: nested}` (match_all dropped)                     |
//! | `bool`         | `bool{filter: [filter.., nested.., bool{must}, bool{must_not}]}`|
//! | `common`       | `bool{must: common, filter: nested}`                           |
//! | `or`           | `bool{filter: [or, nested..]}`                                 |
//! | any other leaf | `bool{must: leaf, filter: nested}`                             |
//!
//! `nested` is a single object for one nested query and a list otherwise.

use super::clause::{BoolClause, ClauseTree, NestedQuery, Slot};

/// Shape of the standard clause, the combiner's decision key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardShape {
    MatchAll,
    Bool,
    Common,
    Or,
    Leaf,
}

impl StandardShape {
    pub fn of(clause: &ClauseTree) -> Self {
        match clause {
            ClauseTree::MatchAll => StandardShape::MatchAll,
            ClauseTree::Bool(_) => StandardShape::Bool,
            ClauseTree::Common { .. } => StandardShape::Common,
            ClauseTree::Or(_) => StandardShape::Or,
            _ => StandardShape::Leaf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StandardShape::MatchAll => "match_all",
            StandardShape::Bool => "bool",
            StandardShape::Common => "common",
            StandardShape::Or => "or",
            StandardShape::Leaf => "leaf",
        }
    }
}

/// Merges the standard clause with the nested queries
pub fn combine(standard: ClauseTree, nested: &[NestedQuery]) -> ClauseTree {
    if nested.is_empty() {
        return standard;
    }
    let nested_clauses: Vec<ClauseTree> = nested.iter().cloned().map(ClauseTree::nested).collect();

    match StandardShape::of(&standard) {
        StandardShape::MatchAll => {
            ClauseTree::Bool(BoolClause::filter(Slot::from_vec(nested_clauses)))
        }
        StandardShape::Or => {
            let mut filter = vec![standard];
            filter.extend(nested_clauses);
            ClauseTree::Bool(BoolClause::filter(Slot::Many(filter)))
        }
        StandardShape::Common | StandardShape::Leaf => ClauseTree::Bool(BoolClause {
            must: Slot::one(standard),
            filter: Slot::from_vec(nested_clauses),
            must_not: Slot::Empty,
        }),
        StandardShape::Bool => {
            let existing = match standard {
                ClauseTree::Bool(b) => b,
                other => BoolClause::must(Slot::one(other)),
            };
            let mut filter = existing.filter.into_vec();
            filter.extend(nested_clauses);
            if !existing.must.is_empty() {
                filter.push(ClauseTree::Bool(BoolClause::must(existing.must)));
            }
            if !existing.must_not.is_empty() {
                filter.push(ClauseTree::Bool(BoolClause::must_not(existing.must_not)));
            }
            ClauseTree::Bool(BoolClause::filter(Slot::Many(filter)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::RangeBound;
    use crate::planner::clause::NestedContext;
    use serde_json::{json, Value};

    fn nested(path: &str) -> NestedQuery {
        NestedQuery::new(
            path,
            NestedContext::Query(ClauseTree::Bool(BoolClause::must(Slot::many(vec![
                ClauseTree::match_value(format!("{}.code", path), "1312"),
            ])))),
        )
    }

    fn nested_json(path: &str) -> Value {
        ClauseTree::nested(nested(path)).to_json()
    }

    #[test]
    fn test_no_nested_passes_through() {
        let standard = ClauseTree::match_value("id", "1");
        assert_eq!(combine(standard.clone(), &[]), standard);
        assert_eq!(combine(ClauseTree::MatchAll, &[]), ClauseTree::MatchAll);
    }

    #[test]
    fn test_match_all_replaced_by_filter() {
        let q = combine(ClauseTree::MatchAll, &[nested("programs")]).to_json();
        assert_eq!(q, json!({"bool": {"filter": nested_json("programs")}}));
        assert!(q.get("match_all").is_none());
    }

    #[test]
    fn test_multiple_nested_paths_share_filter() {
        let q = combine(ClauseTree::MatchAll, &[nested("programs"), nested("owners")]).to_json();
        assert_eq!(
            q,
            json!({"bool": {"filter": [nested_json("programs"), nested_json("owners")]}})
        );
    }

    #[test]
    fn test_leaf_moves_to_must() {
        let q = combine(ClauseTree::match_value("id", "243744"), &[nested("programs")]).to_json();
        assert_eq!(
            q,
            json!({"bool": {
                "must": {"match": {"id": "243744"}},
                "filter": nested_json("programs")
            }})
        );
    }

    #[test]
    fn test_common_promoted_to_must() {
        let common = ClauseTree::Common {
            field: "school.alias".into(),
            query: "state".into(),
        };
        let q = combine(common, &[nested("programs")]).to_json();
        assert_eq!(q["bool"]["must"]["common"]["school.alias"]["query"], json!("state"));
        assert_eq!(q["bool"]["filter"], nested_json("programs"));
    }

    #[test]
    fn test_or_moves_into_filter_list() {
        let or = ClauseTree::Or(vec![ClauseTree::Range {
            field: "size".into(),
            bound: RangeBound::parse("size", "1..2").unwrap(),
        }]);
        let q = combine(or, &[nested("programs")]).to_json();
        assert_eq!(
            q,
            json!({"bool": {"filter": [
                {"or": [{"range": {"size": {"gte": 1, "lte": 2}}}]},
                nested_json("programs")
            ]}})
        );
    }

    #[test]
    fn test_bool_keys_move_into_filter() {
        let standard = ClauseTree::Bool(BoolClause {
            must: Slot::one(ClauseTree::Wildcard {
                field: "_school.name".into(),
                value: "harvard*".into(),
            }),
            filter: Slot::one(ClauseTree::match_value("school.state", "MA")),
            must_not: Slot::many(vec![ClauseTree::match_value("id", "7")]),
        });
        let q = combine(standard, &[nested("programs")]).to_json();
        assert_eq!(
            q,
            json!({"bool": {"filter": [
                {"match": {"school.state": "MA"}},
                nested_json("programs"),
                {"bool": {"must": {"wildcard": {"_school.name": {"value": "harvard*"}}}}},
                {"bool": {"must_not": [{"match": {"id": "7"}}]}}
            ]}})
        );
    }

    #[test]
    fn test_bool_with_only_filter() {
        let standard = ClauseTree::Bool(BoolClause::filter(Slot::one(ClauseTree::GeoDistance {
            field: "location".into(),
            distance: "5mi".into(),
            point: crate::catalog::GeoPoint { lat: 1.0, lon: 2.0 },
        })));
        let q = combine(standard, &[nested("programs")]).to_json();
        let filter = q["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter[0].get("geo_distance").is_some());
        assert!(q["bool"].get("must").is_none());
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(StandardShape::of(&ClauseTree::MatchAll).as_str(), "match_all");
        assert_eq!(
            StandardShape::of(&ClauseTree::Terms {
                field: "id".into(),
                values: vec![]
            }),
            StandardShape::Leaf
        );
    }
}
