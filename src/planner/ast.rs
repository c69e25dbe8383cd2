//! Query parameter and term structures
//!
//! `QueryParameter` is the raw request input; `QueryTerm` is one classified
//! predicate; `NestedGroup` collects the terms sharing a nested path.

use serde_json::{Number, Value};

use crate::catalog::{base_field, GeoPoint};

use super::errors::{PlannerError, PlannerResult};

/// Raw parameter value: a single string, or a list when the key repeats
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Appends another occurrence of the same key
    pub fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(first) => {
                let first = std::mem::take(first);
                *self = ParamValue::List(vec![first, value]);
            }
            ParamValue::List(values) => values.push(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Single(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Single(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

/// One `field_path=value` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    /// Dotted field path, possibly with an operator suffix
    pub field_path: String,
    pub value: ParamValue,
}

impl QueryParameter {
    pub fn new(field_path: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            field_path: field_path.into(),
            value: value.into(),
        }
    }
}

/// Operator suffix on a field path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `__range`
    Range,
    /// `__not`
    Not,
    /// `__ne`
    Ne,
}

impl Operator {
    const ALL: [Operator; 3] = [Operator::Range, Operator::Not, Operator::Ne];

    /// Splits `field__op` into the base field and its operator.
    pub fn split(field_path: &str) -> (&str, Option<Operator>) {
        let base = base_field(field_path);
        let op = field_path
            .get(base.len() + 2..)
            .and_then(|suffix| Self::ALL.into_iter().find(|op| op.suffix() == suffix));
        (base, op)
    }

    pub fn is_negation(&self) -> bool {
        matches!(self, Operator::Not | Operator::Ne)
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Operator::Range => "range",
            Operator::Not => "not",
            Operator::Ne => "ne",
        }
    }
}

/// Normalized parameter value after classification
#[derive(Debug, Clone, PartialEq)]
pub enum TermValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl TermValue {
    pub fn is_list(&self) -> bool {
        matches!(self, TermValue::List(_))
    }

    /// String pieces of the value, one per element
    pub fn texts(&self) -> Vec<String> {
        fn text(v: &Value) -> String {
            match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }
        }
        match self {
            TermValue::Scalar(v) => vec![text(v)],
            TermValue::List(values) => values.iter().map(text).collect(),
        }
    }
}

/// One `gte..lte` interval; at least one side is set
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub gte: Option<Number>,
    pub lte: Option<Number>,
}

impl RangeBound {
    /// Parses `A..B`, `A..`, `..B` or a bare `A` (lower bound only).
    pub fn parse(field: &str, text: &str) -> PlannerResult<Self> {
        let (min, max) = match text.split_once("..") {
            Some((min, max)) => (min.trim(), max.trim()),
            None => (text.trim(), ""),
        };

        let gte = parse_boundary(field, min)?;
        let lte = parse_boundary(field, max)?;
        if gte.is_none() && lte.is_none() {
            return Err(PlannerError::invalid_parameter(
                field,
                format!("range '{}' has no boundaries", text),
            ));
        }
        Ok(Self { gte, lte })
    }

    pub fn to_json(&self) -> Value {
        let mut bounds = serde_json::Map::new();
        if let Some(gte) = &self.gte {
            bounds.insert("gte".into(), Value::Number(gte.clone()));
        }
        if let Some(lte) = &self.lte {
            bounds.insert("lte".into(), Value::Number(lte.clone()));
        }
        Value::Object(bounds)
    }
}

/// A boundary containing `.` is a float, anything else an integer.
fn parse_boundary(field: &str, text: &str) -> PlannerResult<Option<Number>> {
    if text.is_empty() {
        return Ok(None);
    }
    let not_numeric =
        || PlannerError::invalid_parameter(field, format!("boundary '{}' is not numeric", text));

    if text.contains('.') {
        let f: f64 = text.parse().map_err(|_| not_numeric())?;
        Number::from_f64(f).map(Some).ok_or_else(not_numeric)
    } else {
        let i: i64 = text.parse().map_err(|_| not_numeric())?;
        Ok(Some(Number::from(i)))
    }
}

/// A classified predicate. Exactly one variant per parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTerm {
    /// Equality
    Match { field: String, value: Value },
    /// Any of the values
    Terms { field: String, values: Vec<Value> },
    /// OR of one or more intervals
    Range { field: String, bounds: Vec<RangeBound> },
    /// Inner is always `Match` or `Terms`
    Negation(Box<QueryTerm>),
    /// Prefix wildcard on the lowercase `_<field>` shadow
    NameWildcard { field: String, pattern: String },
    /// Common-terms text search
    Autocomplete { field: String, query: String },
    GeoDistance {
        field: String,
        point: GeoPoint,
        distance: String,
    },
}

/// Shape of a term, used to detect mixed groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Match,
    Terms,
    Range,
    Negation,
    NameWildcard,
    Autocomplete,
    GeoDistance,
}

impl QueryTerm {
    /// Create an equality term
    pub fn match_value(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryTerm::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a terms (any-of) term
    pub fn terms(field: impl Into<String>, values: Vec<Value>) -> Self {
        QueryTerm::Terms {
            field: field.into(),
            values,
        }
    }

    /// Negates an equality or terms term
    pub fn negate(inner: QueryTerm) -> Self {
        QueryTerm::Negation(Box::new(inner))
    }

    /// Field the term applies to
    pub fn field(&self) -> &str {
        match self {
            QueryTerm::Match { field, .. }
            | QueryTerm::Terms { field, .. }
            | QueryTerm::Range { field, .. }
            | QueryTerm::NameWildcard { field, .. }
            | QueryTerm::Autocomplete { field, .. }
            | QueryTerm::GeoDistance { field, .. } => field,
            QueryTerm::Negation(inner) => inner.field(),
        }
    }

    pub fn kind(&self) -> TermKind {
        match self {
            QueryTerm::Match { .. } => TermKind::Match,
            QueryTerm::Terms { .. } => TermKind::Terms,
            QueryTerm::Range { .. } => TermKind::Range,
            QueryTerm::Negation(_) => TermKind::Negation,
            QueryTerm::NameWildcard { .. } => TermKind::NameWildcard,
            QueryTerm::Autocomplete { .. } => TermKind::Autocomplete,
            QueryTerm::GeoDistance { .. } => TermKind::GeoDistance,
        }
    }

    /// Terms that need filter context inside a nested query: any-of lists,
    /// ranges, and negated lists.
    pub fn is_filter_context(&self) -> bool {
        match self {
            QueryTerm::Terms { .. } | QueryTerm::Range { .. } => true,
            QueryTerm::Negation(inner) => matches!(**inner, QueryTerm::Terms { .. }),
            _ => false,
        }
    }

    pub fn is_negation(&self) -> bool {
        matches!(self, QueryTerm::Negation(_))
    }

    /// Compact form for explain output
    pub fn describe(&self) -> String {
        match self {
            QueryTerm::Match { field, value } => format!("{} = {}", field, value),
            QueryTerm::Terms { field, values } => {
                format!("{} IN {}", field, Value::Array(values.clone()))
            }
            QueryTerm::Range { field, bounds } => {
                let parts: Vec<String> = bounds
                    .iter()
                    .map(|b| {
                        format!(
                            "{}..{}",
                            b.gte.as_ref().map(|n| n.to_string()).unwrap_or_default(),
                            b.lte.as_ref().map(|n| n.to_string()).unwrap_or_default()
                        )
                    })
                    .collect();
                format!("{} IN RANGE {}", field, parts.join(" OR "))
            }
            QueryTerm::Negation(inner) => format!("NOT ({})", inner.describe()),
            QueryTerm::NameWildcard { field, pattern } => {
                format!("_{} LIKE '{}'", field, pattern)
            }
            QueryTerm::Autocomplete { field, query } => format!("{} ~ '{}'", field, query),
            QueryTerm::GeoDistance {
                field,
                point,
                distance,
            } => format!(
                "{} WITHIN {} OF ({}, {})",
                field, distance, point.lat, point.lon
            ),
        }
    }
}

/// Terms sharing one nested path, in parameter order
#[derive(Debug, Clone, PartialEq)]
pub struct NestedGroup {
    path: String,
    terms: Vec<QueryTerm>,
}

impl NestedGroup {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            terms: Vec::new(),
        }
    }

    /// Adds a term whose field resolved to `term_path`.
    ///
    /// Rejects terms belonging to another nested path.
    pub fn push(&mut self, term_path: &str, term: QueryTerm) -> PlannerResult<()> {
        if term_path != self.path {
            return Err(PlannerError::ambiguous_nested_path(
                term.field(),
                &self.path,
                term_path,
            ));
        }
        self.terms.push(term);
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
