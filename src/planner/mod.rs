//! Query compiler
//!
//! Turns flat `field=value` parameters plus options into a nested-aware
//! boolean query for the search engine.
//!
//! # Pipeline
//!
//! 1. Term classifier: standard vs. nested parameters, value normalization
//! 2. Standard clause builder
//! 3. Nested clause builder: one nested query per nested path
//! 4. Clause combiner: decision table keyed by the standard clause's shape
//! 5. Projection planner and sort compiler
//!
//! # Design Principles
//!
//! - Pure: same parameters and catalog snapshot produce the same plan
//! - Closed clause tree: every node renders to exactly one wire object
//! - Fail fast: invalid values are rejected before anything is sent
//! - Nested sorts reuse the nested query's own predicate

mod ast;
mod classifier;
mod clause;
mod combiner;
mod errors;
mod explain;
mod nested;
mod options;
mod planner;
mod projection;
mod sort;
mod standard;

pub use ast::{
    NestedGroup, Operator, ParamValue, QueryParameter, QueryTerm, RangeBound, TermKind,
    TermValue,
};
pub use classifier::{classify, Classified, ClassifiedParam};
pub use clause::{
    BoolClause, ClauseTree, NestedContext, NestedQuery, Slot, INNER_HITS_SIZE,
};
pub use combiner::{combine, StandardShape};
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use explain::ExplainPlan;
pub use nested::{build_group, nested_query};
pub use options::{
    parse_count, Command, NestedSortMode, Paging, SearchOptions, SearchRequest,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use planner::{OutputOptions, PlannerConfig, QueryPlan, QueryPlanner};
pub use projection::{ProjectionPlan, SourceMode, INTERNAL_FIELDS_PATTERN};
pub use sort::{compile_sort, NestedSort, SortClause};
pub use standard::{build_standard_terms, geo_term, standard_clause, standard_term};
