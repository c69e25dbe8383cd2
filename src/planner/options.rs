//! Request options
//!
//! Paging, projection, sort, stats, geo and output-shape switches that ride
//! alongside the field parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ast::QueryParameter;
use super::errors::{PlannerError, PlannerResult};

/// Page size used when neither the request nor the config sets one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Hard cap on page size
pub const MAX_PAGE_SIZE: usize = 100;

/// Special request commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Compute `extended_stats` over requested numeric fields
    Stats,
}

impl FromStr for Command {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stats" => Ok(Command::Stats),
            other => Err(PlannerError::invalid_option(
                "command",
                format!("unknown command '{}'", other),
            )),
        }
    }
}

/// How a nested sort picks one value out of many subdocuments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestedSortMode {
    /// `min` when ascending, `max` when descending
    #[default]
    Direction,
    Min,
    Max,
    Avg,
    Sum,
    Median,
}

impl NestedSortMode {
    /// The engine `mode` for a sort in the given direction
    pub fn resolve(&self, descending: bool) -> &'static str {
        match self {
            NestedSortMode::Direction if descending => "max",
            NestedSortMode::Direction => "min",
            NestedSortMode::Min => "min",
            NestedSortMode::Max => "max",
            NestedSortMode::Avg => "avg",
            NestedSortMode::Sum => "sum",
            NestedSortMode::Median => "median",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NestedSortMode::Direction => "direction",
            NestedSortMode::Min => "min",
            NestedSortMode::Max => "max",
            NestedSortMode::Avg => "avg",
            NestedSortMode::Sum => "sum",
            NestedSortMode::Median => "median",
        }
    }
}

impl fmt::Display for NestedSortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NestedSortMode {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direction" => Ok(NestedSortMode::Direction),
            "min" => Ok(NestedSortMode::Min),
            "max" => Ok(NestedSortMode::Max),
            "avg" => Ok(NestedSortMode::Avg),
            "sum" => Ok(NestedSortMode::Sum),
            "median" => Ok(NestedSortMode::Median),
            other => Err(PlannerError::invalid_option(
                "nested_sort_mode",
                format!("unknown mode '{}'", other),
            )),
        }
    }
}

/// Options record for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub page: usize,
    /// Falls back to the configured default, capped at [`MAX_PAGE_SIZE`]
    pub per_page: Option<usize>,
    pub fields: Vec<String>,
    pub sort: Option<String>,
    pub command: Option<Command>,
    /// Aggregation outputs to keep; empty keeps all
    pub metrics: Vec<String>,
    pub zip: Option<String>,
    pub distance: Option<String>,
    /// Route nested-path parameters through standard compilation
    pub all_programs: bool,
    /// Nested data comes back flattened in `_source`; inner hits are ignored
    pub all_programs_nested: bool,
    /// Hierarchical result keys instead of dotted ones
    pub keys_nested: bool,
    pub debug: bool,
    pub nested_sort_mode: Option<NestedSortMode>,
}

impl SearchOptions {
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn is_stats(&self) -> bool {
        self.command == Some(Command::Stats)
    }

    /// Resolves paging against the configured default page size
    pub fn paging(&self, default_page_size: usize) -> Paging {
        let per_page = self.per_page.unwrap_or(default_page_size).min(MAX_PAGE_SIZE);
        Paging {
            page: self.page,
            per_page,
            from: self.page.saturating_mul(per_page),
            size: per_page,
        }
    }
}

/// Resolved paging window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: usize,
    pub per_page: usize,
    pub from: usize,
    pub size: usize,
}

/// Parses a non-negative integer option
pub fn parse_count(name: &str, value: &str) -> PlannerResult<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        PlannerError::invalid_option(name, format!("'{}' is not a non-negative integer", value))
    })
}

/// A complete request: field parameters plus options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub params: Vec<QueryParameter>,
    pub options: SearchOptions,
}
