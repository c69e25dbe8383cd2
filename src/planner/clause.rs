//! Wire-level query tree
//!
//! `ClauseTree` is a closed set of node kinds; every node renders to exactly
//! one JSON object in the engine's query language. Bool slots remember
//! whether they were built as a single clause or a list so the rendered
//! shape is stable (`One` renders as an object, `Many` as an array, even
//! with one element).

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::catalog::GeoPoint;

use super::ast::RangeBound;

/// Cutoff frequency for autocomplete `common` queries
pub const COMMON_CUTOFF_FREQUENCY: f64 = 0.001;

/// Low-frequency operator for autocomplete `common` queries
pub const COMMON_LOW_FREQ_OPERATOR: &str = "and";

/// Maximum inner hits returned per nested query
pub const INNER_HITS_SIZE: usize = 100;

/// A query tree node
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseTree {
    MatchAll,
    Match { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Range { field: String, bound: RangeBound },
    /// Legacy `or` of sub-clauses, used for multi-interval ranges
    Or(Vec<ClauseTree>),
    Wildcard { field: String, value: String },
    Common { field: String, query: String },
    GeoDistance {
        field: String,
        distance: String,
        point: GeoPoint,
    },
    Nested(Box<NestedQuery>),
    Bool(BoolClause),
}

/// Children of one bool occasion (`must`, `filter`, `must_not`)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    #[default]
    Empty,
    One(Box<ClauseTree>),
    Many(Vec<ClauseTree>),
}

impl Slot {
    /// `One` for a single clause, `Many` otherwise
    pub fn from_vec(mut clauses: Vec<ClauseTree>) -> Self {
        match clauses.len() {
            0 => Slot::Empty,
            1 => Slot::One(Box::new(clauses.remove(0))),
            _ => Slot::Many(clauses),
        }
    }

    /// Always a list, empty lists excepted
    pub fn many(clauses: Vec<ClauseTree>) -> Self {
        if clauses.is_empty() {
            Slot::Empty
        } else {
            Slot::Many(clauses)
        }
    }

    pub fn one(clause: ClauseTree) -> Self {
        Slot::One(Box::new(clause))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Slot::Empty => true,
            Slot::One(_) => false,
            Slot::Many(v) => v.is_empty(),
        }
    }

    /// Consumes the slot into its clauses
    pub fn into_vec(self) -> Vec<ClauseTree> {
        match self {
            Slot::Empty => Vec::new(),
            Slot::One(c) => vec![*c],
            Slot::Many(v) => v,
        }
    }

    fn to_json(&self) -> Option<Value> {
        match self {
            Slot::Empty => None,
            Slot::One(c) => Some(c.to_json()),
            Slot::Many(v) if v.is_empty() => None,
            Slot::Many(v) => Some(Value::Array(v.iter().map(ClauseTree::to_json).collect())),
        }
    }
}

/// Boolean node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolClause {
    pub must: Slot,
    pub filter: Slot,
    pub must_not: Slot,
}

impl BoolClause {
    pub fn must(slot: Slot) -> Self {
        Self {
            must: slot,
            ..Default::default()
        }
    }

    pub fn filter(slot: Slot) -> Self {
        Self {
            filter: slot,
            ..Default::default()
        }
    }

    pub fn must_not(slot: Slot) -> Self {
        Self {
            must_not: slot,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.filter.is_empty() && self.must_not.is_empty()
    }
}

/// Nested predicate context
#[derive(Debug, Clone, PartialEq)]
pub enum NestedContext {
    /// Rendered under `query`
    Query(ClauseTree),
    /// Rendered under `filter`
    Filter(ClauseTree),
}

/// Query over one nested path, always requesting inner hits
#[derive(Debug, Clone, PartialEq)]
pub struct NestedQuery {
    pub path: String,
    pub context: NestedContext,
    pub inner_hits_size: usize,
}

impl NestedQuery {
    pub fn new(path: impl Into<String>, context: NestedContext) -> Self {
        Self {
            path: path.into(),
            context,
            inner_hits_size: INNER_HITS_SIZE,
        }
    }

    /// The predicate under `query` or `filter`; nested sorts reuse it.
    pub fn predicate(&self) -> &ClauseTree {
        match &self.context {
            NestedContext::Query(c) | NestedContext::Filter(c) => c,
        }
    }

    pub fn to_json(&self) -> Value {
        let (key, clause) = match &self.context {
            NestedContext::Query(c) => ("query", c),
            NestedContext::Filter(c) => ("filter", c),
        };
        let mut body = Map::new();
        body.insert("path".into(), Value::String(self.path.clone()));
        body.insert(key.into(), clause.to_json());
        body.insert("inner_hits".into(), json!({ "size": self.inner_hits_size }));
        json!({ "nested": body })
    }
}

impl ClauseTree {
    pub fn match_value(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ClauseTree::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn nested(query: NestedQuery) -> Self {
        ClauseTree::Nested(Box::new(query))
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, ClauseTree::MatchAll)
    }

    /// Renders the node in the engine's query language
    pub fn to_json(&self) -> Value {
        match self {
            ClauseTree::MatchAll => json!({ "match_all": {} }),
            ClauseTree::Match { field, value } => single("match", field, value.clone()),
            ClauseTree::Terms { field, values } => {
                single("terms", field, Value::Array(values.clone()))
            }
            ClauseTree::Range { field, bound } => single("range", field, bound.to_json()),
            ClauseTree::Or(children) => {
                json!({ "or": children.iter().map(ClauseTree::to_json).collect::<Vec<_>>() })
            }
            ClauseTree::Wildcard { field, value } => {
                single("wildcard", field, json!({ "value": value }))
            }
            ClauseTree::Common { field, query } => single(
                "common",
                field,
                json!({
                    "query": query,
                    "cutoff_frequency": COMMON_CUTOFF_FREQUENCY,
                    "low_freq_operator": COMMON_LOW_FREQ_OPERATOR,
                }),
            ),
            ClauseTree::GeoDistance {
                field,
                distance,
                point,
            } => {
                let mut body = Map::new();
                body.insert("distance".into(), Value::String(distance.clone()));
                body.insert(field.clone(), json!({ "lat": point.lat, "lon": point.lon }));
                json!({ "geo_distance": body })
            }
            ClauseTree::Nested(nested) => nested.to_json(),
            ClauseTree::Bool(b) => {
                let mut body = Map::new();
                if let Some(v) = b.must.to_json() {
                    body.insert("must".into(), v);
                }
                if let Some(v) = b.filter.to_json() {
                    body.insert("filter".into(), v);
                }
                if let Some(v) = b.must_not.to_json() {
                    body.insert("must_not".into(), v);
                }
                json!({ "bool": body })
            }
        }
    }
}

/// `{kind: {field: body}}`
fn single(kind: &str, field: &str, body: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), body);
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}

impl Serialize for ClauseTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_rendering() {
        assert_eq!(ClauseTree::MatchAll.to_json(), json!({"match_all": {}}));
        assert_eq!(
            ClauseTree::match_value("id", "243744").to_json(),
            json!({"match": {"id": "243744"}})
        );
        assert_eq!(
            ClauseTree::Wildcard {
                field: "_school.name".into(),
                value: "new* york*".into()
            }
            .to_json(),
            json!({"wildcard": {"_school.name": {"value": "new* york*"}}})
        );
        assert_eq!(
            ClauseTree::Common {
                field: "school.name".into(),
                query: "state univ".into()
            }
            .to_json(),
            json!({"common": {"school.name": {
                "query": "state univ",
                "cutoff_frequency": 0.001,
                "low_freq_operator": "and"
            }}})
        );
    }

    #[test]
    fn test_geo_distance_rendering() {
        let clause = ClauseTree::GeoDistance {
            field: "location".into(),
            distance: "50mi".into(),
            point: GeoPoint {
                lat: 37.5,
                lon: -122.25,
            },
        };
        assert_eq!(
            clause.to_json(),
            json!({"geo_distance": {"distance": "50mi", "location": {"lat": 37.5, "lon": -122.25}}})
        );
    }

    #[test]
    fn test_slot_shapes() {
        let one = ClauseTree::Bool(BoolClause::must(Slot::one(ClauseTree::match_value("a", 1))));
        assert_eq!(one.to_json(), json!({"bool": {"must": {"match": {"a": 1}}}}));

        let many = ClauseTree::Bool(BoolClause::must_not(Slot::many(vec![
            ClauseTree::match_value("a", 1),
        ])));
        assert_eq!(many.to_json(), json!({"bool": {"must_not": [{"match": {"a": 1}}]}}));

        assert!(Slot::many(Vec::new()).is_empty());
        assert_eq!(Slot::from_vec(vec![ClauseTree::MatchAll]).into_vec().len(), 1);
    }

    #[test]
    fn test_empty_slots_are_omitted() {
        let clause = ClauseTree::Bool(BoolClause {
            must: Slot::Empty,
            filter: Slot::one(ClauseTree::MatchAll),
            must_not: Slot::Many(Vec::new()),
        });
        assert_eq!(clause.to_json(), json!({"bool": {"filter": {"match_all": {}}}}));
    }

    #[test]
    fn test_nested_rendering() {
        let nested = NestedQuery::new(
            "programs",
            NestedContext::Filter(ClauseTree::Terms {
                field: "programs.credential.level".into(),
                values: vec![json!(2), json!(3)],
            }),
        );
        assert_eq!(
            ClauseTree::nested(nested).to_json(),
            json!({"nested": {
                "path": "programs",
                "filter": {"terms": {"programs.credential.level": [2, 3]}},
                "inner_hits": {"size": 100}
            }})
        );
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let clause = ClauseTree::Or(vec![ClauseTree::MatchAll]);
        assert_eq!(serde_json::to_value(&clause).unwrap(), clause.to_json());
    }
}
