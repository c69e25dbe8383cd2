//! Decoded result envelope

use serde::Serialize;
use serde_json::{Map, Value};

use crate::planner::QueryPlan;

use super::raw::RawResponse;

/// One decoded document: an object with dotted or hierarchical keys, or a
/// whole-document `_source` passed through as the engine returned it
pub type ResultDocument = Value;

/// Envelope metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub total: u64,
    pub page: usize,
    pub per_page: usize,
    /// Seconds spent in the engine call, debug only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_time: Option<f64>,
    /// Engine-reported time, debug only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub took_ms: Option<u64>,
}

/// Decoded search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub metadata: Metadata,
    pub results: Vec<ResultDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Map<String, Value>>,
}

impl SearchResult {
    /// Wraps decoded documents with paging, timing and stats
    pub fn assemble(
        plan: &QueryPlan,
        response: &RawResponse,
        results: Vec<ResultDocument>,
        search_time: Option<f64>,
    ) -> Self {
        let size = plan.paging.size;
        let page = if size == 0 { 0 } else { plan.paging.from / size };

        let (search_time, took_ms) = if plan.output.debug {
            (search_time, response.took)
        } else {
            (None, None)
        };

        let aggregations = plan
            .output
            .stats
            .then(|| filter_metrics(response.aggregations.clone().unwrap_or_default(), &plan.output.metrics));

        Self {
            metadata: Metadata {
                total: response.total(),
                page,
                per_page: size,
                search_time,
                took_ms,
            },
            results,
            aggregations,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Keeps only the requested metrics of each aggregation; no list keeps all.
fn filter_metrics(aggregations: Map<String, Value>, metrics: &[String]) -> Map<String, Value> {
    if metrics.is_empty() {
        return aggregations;
    }
    aggregations
        .into_iter()
        .map(|(name, values)| {
            let values = match values {
                Value::Object(stats) => Value::Object(
                    stats
                        .into_iter()
                        .filter(|(k, _)| metrics.iter().any(|m| m == k))
                        .collect(),
                ),
                other => other,
            };
            (name, values)
        })
        .collect()
}
