//! Compile Scenario Tests
//!
//! End-to-end compilation through the public API:
//! - Single equality parameters compile to bare `match` leaves
//! - Nested list values land in filter context
//! - Standard and nested parameters combine under one `bool`
//! - Paging is clamped, sorts reuse nested predicates
//! - Projection follows the requested fields

use nestsearch::catalog::{CatalogLoader, FieldCatalog};
use nestsearch::planner::{
    PlannerConfig, PlannerErrorCode, PlannerResult, QueryPlan, QueryPlanner,
};
use nestsearch::rest_api::parse_query_string;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn catalog() -> FieldCatalog {
    CatalogLoader::parse(
        &json!({
            "field_types": {
                "id": "integer",
                "size": "integer",
                "school.name": "name",
                "school.alias": "autocomplete",
                "school.state": "string",
                "programs.code": "string",
                "programs.credential.level": "integer",
                "programs.earnings": "float",
                "location": "lat_lon"
            },
            "nested": ["programs"],
            "locations": {"94105": {"lat": 37.78, "lon": -122.39}}
        })
        .to_string(),
        "test-catalog",
    )
    .unwrap()
}

fn compile(query: &str) -> PlannerResult<QueryPlan> {
    let catalog = catalog();
    let request = parse_query_string(query)?;
    QueryPlanner::new(&catalog, PlannerConfig::default()).plan(&request.params, &request.options)
}

fn body(query: &str) -> Value {
    compile(query).unwrap().to_request_body()
}

// =============================================================================
// Standard Clause Tests
// =============================================================================

/// A single equality parameter is exactly a `match` leaf.
#[test]
fn test_single_equality_is_match_leaf() {
    assert_eq!(body("school.state=CA")["query"], json!({"match": {"school.state": "CA"}}));
    assert_eq!(body("id=243744")["query"], json!({"match": {"id": "243744"}}));
    assert_eq!(body("unknown.field=x")["query"], json!({"match": {"unknown.field": "x"}}));
}

#[test]
fn test_integer_list_compiles_to_terms() {
    assert_eq!(body("id=1,2,3")["query"], json!({"terms": {"id": [1, 2, 3]}}));
}

#[test]
fn test_name_field_compiles_to_prefix_wildcard() {
    assert_eq!(
        body("school.name=New%20York")["query"],
        json!({"wildcard": {"_school.name": {"value": "new* york*"}}})
    );
}

#[test]
fn test_autocomplete_compiles_to_common() {
    assert_eq!(
        body("school.alias=harv")["query"],
        json!({"common": {"school.alias": {
            "query": "harv",
            "cutoff_frequency": 0.001,
            "low_freq_operator": "and"
        }}})
    );
}

#[test]
fn test_range_compiles_to_or() {
    assert_eq!(
        body("size__range=..100,500..")["query"],
        json!({"or": [
            {"range": {"size": {"lte": 100}}},
            {"range": {"size": {"gte": 500}}}
        ]})
    );
}

#[test]
fn test_negation_sits_in_bool() {
    assert_eq!(
        body("school.state__not=CA")["query"],
        json!({"bool": {"must_not": [{"match": {"school.state": "CA"}}]}})
    );
}

// =============================================================================
// Geo Tests
// =============================================================================

#[test]
fn test_no_distance_no_geo_clause() {
    let q = body("zip=94105&school.state=CA");
    assert!(!q["query"].to_string().contains("geo_distance"));
}

#[test]
fn test_distance_defaults_to_miles() {
    assert_eq!(
        body("zip=94105&distance=50")["query"],
        json!({"bool": {"filter": {"geo_distance": {
            "distance": "50mi",
            "location": {"lat": 37.78, "lon": -122.39}
        }}}})
    );
    assert_eq!(
        body("zip=94105&distance=10km")["query"]["bool"]["filter"]["geo_distance"]["distance"],
        json!("10km")
    );
}

#[test]
fn test_unknown_zip_rejected() {
    let err = compile("zip=00000&distance=5").unwrap_err();
    assert_eq!(err.code(), PlannerErrorCode::UnknownLocation);
}

// =============================================================================
// Nested Clause Tests
// =============================================================================

/// Scenario A: a bracketed integer list under a nested path is a `terms`
/// leaf in filter context.
#[test]
fn test_scenario_a_nested_list_in_filter() {
    assert_eq!(
        body("programs.credential.level=[2,3,5]")["query"],
        json!({"bool": {"filter": {"nested": {
            "path": "programs",
            "filter": {"terms": {"programs.credential.level": [2, 3, 5]}},
            "inner_hits": {"size": 100}
        }}}})
    );
}

/// A negated list inside a nested path is never a bare match.
#[test]
fn test_nested_negated_list() {
    let q = body("programs.code__not=13,14");
    assert_eq!(
        q["query"]["bool"]["filter"]["nested"]["query"],
        json!({"bool": {"filter": [
            {"bool": {"must_not": [{"terms": {"programs.code": ["13", "14"]}}]}}
        ]}})
    );
}

#[test]
fn test_nested_equality_uses_must() {
    let q = body("programs.code=13");
    assert_eq!(
        q["query"]["bool"]["filter"]["nested"]["query"],
        json!({"bool": {"must": [{"match": {"programs.code": "13"}}]}})
    );
}

#[test]
fn test_nested_mixed_kinds_use_filter() {
    let q = body("programs.code=13&programs.earnings__range=1000..");
    assert_eq!(
        q["query"]["bool"]["filter"]["nested"]["query"],
        json!({"bool": {"filter": [
            {"bool": {"must": [{"match": {"programs.code": "13"}}]}},
            {"range": {"programs.earnings": {"gte": 1000}}}
        ]}})
    );
}

/// Scenario B: one standard and one nested parameter.
#[test]
fn test_scenario_b_standard_plus_nested() {
    assert_eq!(
        body("id=243744&programs.code=1312")["query"],
        json!({"bool": {
            "must": {"match": {"id": "243744"}},
            "filter": {"nested": {
                "path": "programs",
                "query": {"bool": {"must": [{"match": {"programs.code": "1312"}}]}},
                "inner_hits": {"size": 100}
            }}
        }})
    );
}

#[test]
fn test_all_programs_bypasses_nested() {
    assert_eq!(
        body("programs.code=1312&all_programs=true")["query"],
        json!({"match": {"programs.code": "1312"}})
    );
}

// =============================================================================
// Paging And Sort Tests
// =============================================================================

/// Scenario C: page size is clamped and `from` defaults to 0.
#[test]
fn test_scenario_c_paging_clamped() {
    let q = body("per_page=500");
    assert_eq!(q["size"], json!(100));
    assert_eq!(q["from"], json!(0));

    let q = body("per_page=10&page=3");
    assert_eq!((q["from"].clone(), q["size"].clone()), (json!(30), json!(10)));
}

/// Scenario D: a nested sort carries the query's own nested predicate.
#[test]
fn test_scenario_d_nested_sort_reuses_filter() {
    let q = body("programs.earnings__range=1000..&sort=programs.earnings:desc");
    let predicate = q["query"]["bool"]["filter"]["nested"]["filter"].clone();
    assert!(!predicate.is_null());
    assert_eq!(
        q["sort"],
        json!([{"programs.earnings": {
            "order": "desc",
            "nested_path": "programs",
            "nested_filter": predicate,
            "mode": "max"
        }}])
    );
}

#[test]
fn test_sort_on_autocomplete_uses_shadow_field() {
    let q = body("sort=school.alias,size:desc");
    assert_eq!(
        q["sort"],
        json!([
            {"_school.alias": {"order": "asc"}},
            {"size": {"order": "desc"}}
        ])
    );
}

// =============================================================================
// Projection Tests
// =============================================================================

/// Scenario E: no fields and no nested query excludes internal fields.
#[test]
fn test_scenario_e_whole_source() {
    let q = body("school.state=CA");
    assert_eq!(q["_source"], json!({"exclude": ["_*"]}));
    assert!(q.get("fields").is_none());
}

#[test]
fn test_standard_fields_use_retrieval_channel() {
    let q = body("_fields=id,school.name");
    assert_eq!(q["_source"], json!(false));
    assert_eq!(q["fields"], json!(["id", "school.name"]));
}

#[test]
fn test_nested_fields_without_nested_query_use_source() {
    let q = body("_fields=id,programs.code");
    assert_eq!(q["_source"], json!(["programs.code"]));
    assert_eq!(q["fields"], json!(["id"]));
}

#[test]
fn test_nested_query_disables_source() {
    assert_eq!(body("programs.code=13")["_source"], json!(false));
    assert_eq!(
        body("programs.code=13&_fields=programs.code&all_programs_nested")["_source"],
        json!(["programs.code"])
    );
}

// =============================================================================
// Aggregation Tests
// =============================================================================

#[test]
fn test_stats_aggregates_numeric_fields() {
    let plan = compile("command=stats&_fields=size,school.state,programs.earnings").unwrap();
    assert!(plan.count_only);
    let q = plan.to_request_body();
    assert_eq!(
        q["aggs"],
        json!({
            "size": {"extended_stats": {"field": "size"}},
            "programs.earnings": {"extended_stats": {"field": "programs.earnings"}}
        })
    );
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_invalid_values_fail_fast() {
    for query in [
        "size__range=big..",
        "programs.credential.level=2,x",
        "sort=size:sideways",
        "per_page=-3",
    ] {
        assert!(compile(query).is_err(), "{}", query);
    }

    let err = compile("size__range=a..b").unwrap_err();
    assert_eq!(err.code(), PlannerErrorCode::InvalidParameter);
    assert_eq!(err.field(), Some("size__range"));
}

#[test]
fn test_malformed_sort_specs_rejected() {
    for query in ["sort=size:desc:asc", "sort=size%20desc", "sort=size;desc"] {
        let err = compile(query).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::InvalidSort, "{}", query);
    }
}
