//! # Query String Parser
//!
//! Splits a URL query string into field parameters and request options.
//! Option keys may carry a leading underscore (`_fields`, `fields`).
//! Every other key is a field parameter; a repeated key becomes a list.

use crate::planner::{
    parse_count, PlannerError, PlannerResult, QueryParameter, SearchOptions, SearchRequest,
};

/// Parses a raw (still percent-encoded) query string
pub fn parse_query_string(query: &str) -> PlannerResult<SearchRequest> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()));
    parse_pairs(pairs)
}

/// Parses already-decoded `key=value` pairs, in order
pub fn parse_pairs(
    pairs: impl IntoIterator<Item = (String, String)>,
) -> PlannerResult<SearchRequest> {
    let mut params: Vec<QueryParameter> = Vec::new();
    let mut options = SearchOptions::default();

    for (key, value) in pairs {
        if key.is_empty() {
            continue;
        }
        if apply_option(&mut options, &key, &value)? {
            continue;
        }
        match params.iter_mut().find(|p| p.field_path == key) {
            Some(existing) => existing.value.push(value),
            None => params.push(QueryParameter::new(key, value)),
        }
    }

    Ok(SearchRequest { params, options })
}

/// Applies `key` as an option; `false` when it is a field parameter
fn apply_option(options: &mut SearchOptions, key: &str, value: &str) -> PlannerResult<bool> {
    let name = key.strip_prefix('_').unwrap_or(key);
    match name {
        "page" => options.page = parse_count(name, value)?,
        "per_page" => options.per_page = Some(parse_count(name, value)?),
        "fields" => options.fields = comma_list(value),
        "sort" => options.sort = Some(value.to_string()),
        "command" => options.command = Some(value.trim().parse()?),
        "metrics" => options.metrics = comma_list(value),
        "zip" => options.zip = Some(value.to_string()),
        "distance" => options.distance = Some(value.to_string()),
        "all_programs" => options.all_programs = parse_flag(name, value)?,
        "all_programs_nested" => options.all_programs_nested = parse_flag(name, value)?,
        "keys_nested" => options.keys_nested = parse_flag(name, value)?,
        "debug" => options.debug = parse_flag(name, value)?,
        "nested_sort_mode" => options.nested_sort_mode = Some(value.trim().parse()?),
        _ => return Ok(false),
    }
    Ok(true)
}

fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(name: &str, value: &str) -> PlannerResult<bool> {
    match value.trim() {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(PlannerError::invalid_option(
            name,
            format!("'{}' is not a boolean", other),
        )),
    }
}
