//! Search facade
//!
//! Runs one request end to end against a single catalog snapshot:
//! compile, execute through the client, decode, wrap in the envelope.
//! A reload during a request does not affect it.

use std::sync::Arc;

use serde_json::Value;

use crate::catalog::{CatalogHandle, FieldCatalog};
use crate::decoder::{ResponseDecoder, SearchResult};
use crate::observability::{MetricsRegistry, Timer};
use crate::planner::{PlannerConfig, QueryPlan, QueryPlanner, SearchRequest};

use super::client::{EngineRequest, SearchClient};
use super::errors::SearchResultOf;

/// Default engine index name
pub const DEFAULT_INDEX: &str = "documents";

/// Compile, execute and decode pipeline
pub struct SearchService<C: SearchClient> {
    catalog: CatalogHandle,
    client: C,
    config: PlannerConfig,
    index: String,
    metrics: Arc<MetricsRegistry>,
}

impl<C: SearchClient> SearchService<C> {
    pub fn new(catalog: CatalogHandle, client: C, config: PlannerConfig) -> Self {
        Self {
            catalog,
            client,
            config,
            index: DEFAULT_INDEX.to_string(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Shares counters with other components
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Compiles a request against the current catalog
    pub fn compile(&self, request: &SearchRequest) -> SearchResultOf<QueryPlan> {
        let catalog = self.catalog.snapshot();
        self.compile_with(&catalog, request)
    }

    /// Runs the whole pipeline
    pub fn search(&self, request: &SearchRequest) -> SearchResultOf<SearchResult> {
        let catalog = self.catalog.snapshot();
        let plan = self.compile_with(&catalog, request)?;

        let engine_request = EngineRequest {
            index: self.index.clone(),
            body: plan.to_request_body(),
            count_only: plan.count_only,
        };
        tracing::debug!(
            index = %engine_request.index,
            count_only = engine_request.count_only,
            body = %engine_request.body,
            "executing search"
        );

        let timer = Timer::new();
        let raw = self.client.execute(&engine_request)?;
        let search_time = timer.elapsed_secs();
        tracing::info!(
            index = %self.index,
            elapsed_ms = timer.elapsed_ms() as u64,
            "search executed"
        );

        self.decode_with(&catalog, &plan, raw, Some(search_time))
    }

    /// Decodes a raw engine response for a request compiled now
    pub fn decode(&self, request: &SearchRequest, raw: Value) -> SearchResultOf<SearchResult> {
        let catalog = self.catalog.snapshot();
        let plan = self.compile_with(&catalog, request)?;
        self.decode_with(&catalog, &plan, raw, None)
    }

    fn compile_with(
        &self,
        catalog: &FieldCatalog,
        request: &SearchRequest,
    ) -> SearchResultOf<QueryPlan> {
        match QueryPlanner::new(catalog, self.config).plan(&request.params, &request.options) {
            Ok(plan) => {
                self.metrics.record_compiled(plan.nested_queries.len());
                Ok(plan)
            }
            Err(err) => {
                self.metrics.increment_queries_rejected();
                tracing::debug!(error = %err, "request rejected");
                Err(err.into())
            }
        }
    }

    fn decode_with(
        &self,
        catalog: &FieldCatalog,
        plan: &QueryPlan,
        raw: Value,
        search_time: Option<f64>,
    ) -> SearchResultOf<SearchResult> {
        let (result, stats) = ResponseDecoder::new(catalog, plan).decode_value(raw, search_time)?;
        self.metrics
            .record_decoded(stats.inner_hit_groups, stats.null_fields);
        Ok(result)
    }
}
