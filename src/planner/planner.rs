//! Query planner
//!
//! Runs the compile pipeline for one request against one catalog snapshot:
//!
//! 1. classify parameters (standard vs. nested by path)
//! 2. build the standard clause and one nested query per path
//! 3. combine them
//! 4. plan projection, sort, paging and aggregations
//!
//! The resulting `QueryPlan` is immutable and is needed again to decode
//! the engine's response.

use serde_json::{json, Map, Value};

use crate::catalog::FieldCatalog;

use super::ast::{NestedGroup, QueryParameter, QueryTerm};
use super::classifier::classify;
use super::clause::{ClauseTree, NestedQuery};
use super::combiner::combine;
use super::errors::PlannerResult;
use super::nested::{build_group, nested_query};
use super::options::{NestedSortMode, Paging, SearchOptions, DEFAULT_PAGE_SIZE};
use super::projection::ProjectionPlan;
use super::sort::{compile_sort, SortClause};
use super::standard::{build_standard_terms, standard_clause};

/// Planner settings that come from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub default_page_size: usize,
    pub nested_sort_mode: NestedSortMode,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            nested_sort_mode: NestedSortMode::default(),
        }
    }
}

/// Caller switches the decoder needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Hierarchical keys instead of dotted ones
    pub keys_nested: bool,
    /// Nested data was requested through `_source`; ignore inner hits
    pub flatten_nested: bool,
    /// Include aggregations in the envelope
    pub stats: bool,
    /// Aggregation outputs to keep; empty keeps all
    pub metrics: Vec<String>,
    /// Include timing metadata
    pub debug: bool,
}

/// Immutable compiled request
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub standard_terms: Vec<QueryTerm>,
    pub standard_clause: ClauseTree,
    pub nested_groups: Vec<NestedGroup>,
    pub nested_queries: Vec<NestedQuery>,
    pub combined_clause: ClauseTree,
    pub projection: ProjectionPlan,
    pub sort: Vec<SortClause>,
    pub paging: Paging,
    /// Numeric fields that get an `extended_stats` aggregation
    pub aggregations: Vec<String>,
    /// The client should ask for hit counts only
    pub count_only: bool,
    pub output: OutputOptions,
}

impl QueryPlan {
    /// Whether any nested query is part of the compiled clause
    pub fn has_nested_query(&self) -> bool {
        !self.nested_queries.is_empty()
    }

    /// Whether a nested query was built for `path`
    pub fn queries_path(&self, path: &str) -> bool {
        self.nested_queries.iter().any(|q| q.path == path)
    }

    /// Engine search-request body
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("from".into(), json!(self.paging.from));
        body.insert("size".into(), json!(self.paging.size));
        body.insert("query".into(), self.combined_clause.to_json());
        body.insert("_source".into(), self.projection.source_mode.to_json());
        if !self.projection.retrieval_fields.is_empty() {
            body.insert("fields".into(), json!(self.projection.retrieval_fields));
        }
        if !self.sort.is_empty() {
            body.insert(
                "sort".into(),
                Value::Array(self.sort.iter().map(SortClause::to_json).collect()),
            );
        }
        if !self.aggregations.is_empty() {
            let aggs: Map<String, Value> = self
                .aggregations
                .iter()
                .map(|f| (f.clone(), json!({ "extended_stats": { "field": f } })))
                .collect();
            body.insert("aggs".into(), Value::Object(aggs));
        }
        Value::Object(body)
    }
}

/// Compiles requests against a catalog snapshot
pub struct QueryPlanner<'a> {
    catalog: &'a FieldCatalog,
    config: PlannerConfig,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(catalog: &'a FieldCatalog, config: PlannerConfig) -> Self {
        Self { catalog, config }
    }

    /// Compiles one request. Fails before anything reaches the engine.
    pub fn plan(&self, params: &[QueryParameter], options: &SearchOptions) -> PlannerResult<QueryPlan> {
        let classified = classify(params, self.catalog, options.all_programs)?;
        tracing::debug!(
            standard = classified.standard.len(),
            nested = classified.nested_param_count(),
            paths = ?classified.nested.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>(),
            "classified parameters"
        );

        let standard_terms = build_standard_terms(&classified.standard, options, self.catalog)?;
        let standard = standard_clause(&standard_terms);

        let nested_groups = classified
            .nested
            .iter()
            .map(|(path, params)| build_group(path, params, self.catalog))
            .collect::<PlannerResult<Vec<_>>>()?;
        let nested_queries: Vec<NestedQuery> = nested_groups.iter().map(nested_query).collect();

        let combined_clause = combine(standard.clone(), &nested_queries);

        let projection = ProjectionPlan::build(
            &options.fields,
            self.catalog,
            !nested_queries.is_empty(),
            options.all_programs_nested,
        );

        let sort_mode = options
            .nested_sort_mode
            .unwrap_or(self.config.nested_sort_mode);
        let sort = match options.sort.as_deref() {
            Some(spec) => compile_sort(spec, self.catalog, &nested_queries, sort_mode)?,
            None => Vec::new(),
        };

        let stats = options.is_stats();
        let aggregations = if stats {
            self.numeric_fields(&options.fields)
        } else {
            Vec::new()
        };

        Ok(QueryPlan {
            standard_terms,
            standard_clause: standard,
            nested_groups,
            nested_queries,
            combined_clause,
            projection,
            sort,
            paging: options.paging(self.config.default_page_size),
            aggregations,
            count_only: stats,
            output: OutputOptions {
                keys_nested: options.keys_nested,
                flatten_nested: options.all_programs_nested,
                stats,
                metrics: options.metrics.clone(),
                debug: options.debug,
            },
        })
    }

    fn numeric_fields(&self, fields: &[String]) -> Vec<String> {
        fields
            .iter()
            .filter(|f| {
                self.catalog
                    .declared_type(f)
                    .map(|t| t.is_numeric())
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldType, NestedPathIndex};
    use crate::planner::{Command, PlannerErrorCode};
    use std::collections::HashMap;

    fn catalog() -> FieldCatalog {
        let mut types = HashMap::new();
        types.insert("id".to_string(), FieldType::Integer);
        types.insert("size".to_string(), FieldType::Integer);
        types.insert("ratio".to_string(), FieldType::Float);
        types.insert("programs.earnings".to_string(), FieldType::Float);
        FieldCatalog::new(types, NestedPathIndex::new(["programs"]).unwrap())
    }

    fn plan(params: &[(&str, &str)], options: SearchOptions) -> PlannerResult<QueryPlan> {
        let catalog = catalog();
        let params: Vec<_> = params
            .iter()
            .map(|(k, v)| QueryParameter::new(*k, *v))
            .collect();
        QueryPlanner::new(&catalog, PlannerConfig::default()).plan(&params, &options)
    }

    #[test]
    fn test_minimal_body() {
        let body = plan(&[], SearchOptions::default()).unwrap().to_request_body();
        assert_eq!(
            body,
            json!({
                "from": 0,
                "size": 20,
                "query": {"match_all": {}},
                "_source": {"exclude": ["_*"]}
            })
        );
    }

    #[test]
    fn test_standard_plus_nested() {
        let p = plan(
            &[("id", "243744"), ("programs.code", "1312")],
            SearchOptions::default(),
        )
        .unwrap();
        assert!(p.has_nested_query());
        assert!(p.queries_path("programs"));
        let body = p.to_request_body();
        assert_eq!(body["query"]["bool"]["must"], json!({"match": {"id": "243744"}}));
        assert_eq!(body["query"]["bool"]["filter"]["nested"]["path"], json!("programs"));
        assert_eq!(body["_source"], json!(false));
    }

    #[test]
    fn test_stats_aggregations_only_numeric() {
        let opts = SearchOptions {
            command: Some(Command::Stats),
            fields: vec!["size".into(), "school.name".into(), "ratio".into()],
            ..Default::default()
        };
        let p = plan(&[], opts).unwrap();
        assert!(p.count_only);
        assert_eq!(p.aggregations, vec!["size".to_string(), "ratio".to_string()]);
        let body = p.to_request_body();
        assert_eq!(body["aggs"]["size"], json!({"extended_stats": {"field": "size"}}));
        assert!(body["aggs"].get("school.name").is_none());
    }

    #[test]
    fn test_stats_without_numeric_fields_has_no_aggs() {
        let opts = SearchOptions {
            command: Some(Command::Stats),
            fields: vec!["school.name".into()],
            ..Default::default()
        };
        let body = plan(&[], opts).unwrap().to_request_body();
        assert!(body.get("aggs").is_none());
    }

    #[test]
    fn test_sort_mode_override() {
        let opts = SearchOptions {
            sort: Some("programs.earnings".into()),
            nested_sort_mode: Some(NestedSortMode::Median),
            ..Default::default()
        };
        let body = plan(&[], opts).unwrap().to_request_body();
        assert_eq!(body["sort"][0]["programs.earnings"]["mode"], json!("median"));
    }

    #[test]
    fn test_errors_fail_fast() {
        let err = plan(&[("size__range", "x..y")], SearchOptions::default()).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::InvalidParameter);

        let opts = SearchOptions {
            sort: Some("size:up".into()),
            ..Default::default()
        };
        let err = plan(&[], opts).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::InvalidSort);
    }

    #[test]
    fn test_all_programs_bypasses_nested() {
        let opts = SearchOptions {
            all_programs: true,
            ..Default::default()
        };
        let p = plan(&[("programs.code", "1312")], opts).unwrap();
        assert!(!p.has_nested_query());
        assert_eq!(
            p.combined_clause.to_json(),
            json!({"match": {"programs.code": "1312"}})
        );
    }

    #[test]
    fn test_planning_is_deterministic() {
        let params = [("id", "1,2"), ("programs.earnings__range", "1..")];
        let a = plan(&params, SearchOptions::default()).unwrap();
        let b = plan(&params, SearchOptions::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_request_body(), b.to_request_body());
    }
}
