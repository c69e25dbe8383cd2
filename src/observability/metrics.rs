//! Counters for the compile/decode pipeline
//!
//! - Counters only, monotonic, reset on process start
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of pipeline counters
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Requests compiled successfully
    queries_compiled: AtomicU64,
    /// Requests rejected by the compiler
    queries_rejected: AtomicU64,
    /// Nested queries built across all requests
    nested_queries_built: AtomicU64,
    /// Responses decoded
    responses_decoded: AtomicU64,
    /// Inner-hit groups merged into result documents
    inner_hit_groups_merged: AtomicU64,
    /// Null fields synthesized for missing requested fields
    null_fields_filled: AtomicU64,
    /// Catalog reloads
    catalog_reloads: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a compiled request and the nested queries it built
    pub fn record_compiled(&self, nested_queries: usize) {
        self.queries_compiled.fetch_add(1, Ordering::Relaxed);
        self.nested_queries_built
            .fetch_add(nested_queries as u64, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a decoded response
    pub fn record_decoded(&self, inner_hit_groups: usize, null_fields: usize) {
        self.responses_decoded.fetch_add(1, Ordering::Relaxed);
        self.inner_hit_groups_merged
            .fetch_add(inner_hit_groups as u64, Ordering::Relaxed);
        self.null_fields_filled
            .fetch_add(null_fields as u64, Ordering::Relaxed);
    }

    pub fn increment_catalog_reloads(&self) {
        self.catalog_reloads.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_compiled: self.queries_compiled.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            nested_queries_built: self.nested_queries_built.load(Ordering::Relaxed),
            responses_decoded: self.responses_decoded.load(Ordering::Relaxed),
            inner_hit_groups_merged: self.inner_hit_groups_merged.load(Ordering::Relaxed),
            null_fields_filled: self.null_fields_filled.load(Ordering::Relaxed),
            catalog_reloads: self.catalog_reloads.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_compiled: u64,
    pub queries_rejected: u64,
    pub nested_queries_built: u64,
    pub responses_decoded: u64,
    pub inner_hit_groups_merged: u64,
    pub null_fields_filled: u64,
    pub catalog_reloads: u64,
}
