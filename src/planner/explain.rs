//! Explain output
//!
//! Deterministic, human-readable summary of a compiled request.

use std::fmt;

use serde::Serialize;

use super::combiner::StandardShape;
use super::errors::PlannerError;
use super::planner::QueryPlan;
use super::projection::SourceMode;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Whether compilation succeeded
    pub accepted: bool,
    /// Standard terms, one line each
    pub standard_terms: Vec<String>,
    /// Shape the combiner keyed on
    pub standard_shape: Option<String>,
    /// `(path, terms)` per nested group
    pub nested_groups: Vec<(String, Vec<String>)>,
    /// `_source` mode description
    pub source: Option<String>,
    /// Fields requested through the retrieval channel
    pub retrieval_fields: Vec<String>,
    /// Inner-hit post filters, `path: keys`
    pub nested_filters: Vec<String>,
    pub sort: Vec<String>,
    pub from: Option<usize>,
    pub size: Option<usize>,
    pub aggregations: Vec<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a compiled request
    pub fn from_plan(plan: &QueryPlan) -> Self {
        let source = match &plan.projection.source_mode {
            SourceMode::Exclude(patterns) => format!("EXCLUDE {}", patterns.join(", ")),
            SourceMode::Include(fields) => format!("INCLUDE {}", fields.join(", ")),
            SourceMode::Disabled => "DISABLED".to_string(),
        };

        let nested_filters = plan
            .projection
            .nested_projection
            .iter()
            .map(|(path, keys)| {
                if keys.is_empty() {
                    format!("{}: *", path)
                } else {
                    format!("{}: {}", path, keys.join(", "))
                }
            })
            .collect();

        let sort = plan
            .sort
            .iter()
            .map(|s| match &s.nested {
                Some(n) => format!(
                    "{} {} (nested {}, mode {}{})",
                    s.field,
                    s.order(),
                    n.path,
                    n.mode,
                    if n.filter.is_some() { ", filtered" } else { "" }
                ),
                None => format!("{} {}", s.field, s.order()),
            })
            .collect();

        Self {
            accepted: true,
            standard_terms: plan.standard_terms.iter().map(|t| t.describe()).collect(),
            standard_shape: Some(StandardShape::of(&plan.standard_clause).as_str().to_string()),
            nested_groups: plan
                .nested_groups
                .iter()
                .map(|g| {
                    (
                        g.path().to_string(),
                        g.terms().iter().map(|t| t.describe()).collect(),
                    )
                })
                .collect(),
            source: Some(source),
            retrieval_fields: plan.projection.retrieval_fields.clone(),
            nested_filters,
            sort,
            from: Some(plan.paging.from),
            size: Some(plan.paging.size),
            aggregations: plan.aggregations.clone(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a compile error
    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            accepted: false,
            standard_terms: Vec::new(),
            standard_shape: None,
            nested_groups: Vec::new(),
            source: None,
            retrieval_fields: Vec::new(),
            nested_filters: Vec::new(),
            sort: Vec::new(),
            from: None,
            size: None,
            aggregations: Vec::new(),
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if !self.accepted {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Status: ACCEPTED")?;
        if !self.standard_terms.is_empty() {
            writeln!(f, "Standard Terms:")?;
            for term in &self.standard_terms {
                writeln!(f, "  - {}", term)?;
            }
        }
        if let Some(shape) = &self.standard_shape {
            writeln!(f, "Standard Shape: {}", shape)?;
        }
        for (path, terms) in &self.nested_groups {
            writeln!(f, "Nested [{}]:", path)?;
            for term in terms {
                writeln!(f, "  - {}", term)?;
            }
        }
        if let Some(source) = &self.source {
            writeln!(f, "Source: {}", source)?;
        }
        if !self.retrieval_fields.is_empty() {
            writeln!(f, "Fields: {}", self.retrieval_fields.join(", "))?;
        }
        for filter in &self.nested_filters {
            writeln!(f, "Inner Hits Filter: {}", filter)?;
        }
        for sort in &self.sort {
            writeln!(f, "Sort: {}", sort)?;
        }
        if let (Some(from), Some(size)) = (self.from, self.size) {
            writeln!(f, "Window: from {} size {}", from, size)?;
        }
        if !self.aggregations.is_empty() {
            writeln!(f, "Stats: {}", self.aggregations.join(", "))?;
        }

        Ok(())
    }
}
