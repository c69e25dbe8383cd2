//! Response decoder
//!
//! Reads hits back with the projection plan used to request them:
//!
//! 1. whole-document mode returns `_source` verbatim, whatever its shape
//! 2. otherwise `fields` is merged with the dotted-flattened `_source`
//! 3. single-element arrays on non-nested fields collapse to scalars
//! 4. inner hits are merged under their nested path (unless nested data
//!    was requested flattened into `_source`)
//! 5. requested fields still missing are set to null
//! 6. keys are nested last, when asked for

use serde_json::{Map, Value};

use crate::catalog::FieldCatalog;
use crate::planner::QueryPlan;

use super::errors::DecodeResult;
use super::flatten::{flatten_dotted, nest_dotted};
use super::raw::{RawHit, RawInnerHits, RawResponse};
use super::result::{ResultDocument, SearchResult};

/// Counts gathered while decoding one response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Inner-hit groups merged into documents
    pub inner_hit_groups: usize,
    /// Requested fields filled with null
    pub null_fields: usize,
}

/// Decodes responses for one compiled request
pub struct ResponseDecoder<'a> {
    catalog: &'a FieldCatalog,
    plan: &'a QueryPlan,
}

impl<'a> ResponseDecoder<'a> {
    pub fn new(catalog: &'a FieldCatalog, plan: &'a QueryPlan) -> Self {
        Self { catalog, plan }
    }

    /// Reads a raw JSON response into the result envelope
    pub fn decode_value(
        &self,
        raw: Value,
        search_time: Option<f64>,
    ) -> DecodeResult<(SearchResult, DecodeStats)> {
        let response = RawResponse::from_value(raw)?;
        let (results, stats) = self.decode_counted(&response);
        Ok((
            SearchResult::assemble(self.plan, &response, results, search_time),
            stats,
        ))
    }

    /// Decodes every hit, in hit order
    pub fn decode(&self, response: &RawResponse) -> Vec<ResultDocument> {
        self.decode_counted(response).0
    }

    /// Like [`decode`](Self::decode), also returning what was synthesized
    pub fn decode_counted(&self, response: &RawResponse) -> (Vec<ResultDocument>, DecodeStats) {
        let mut stats = DecodeStats::default();
        if self.plan.projection.source_mode.is_whole_document() {
            let docs = response
                .hits
                .hits
                .iter()
                .map(|hit| hit.source.clone().unwrap_or_else(|| Value::Object(Map::new())))
                .collect();
            return (docs, stats);
        }
        let docs = response
            .hits
            .hits
            .iter()
            .map(|hit| Value::Object(self.decode_hit(hit, &mut stats)))
            .collect();
        (docs, stats)
    }

    fn decode_hit(&self, hit: &RawHit, stats: &mut DecodeStats) -> Map<String, Value> {
        let mut found = hit.fields.clone().unwrap_or_default();

        match &hit.source {
            Some(source @ Value::Object(_)) => found.extend(flatten_dotted(source)),
            Some(Value::Bool(_)) | Some(Value::Null) | None => {}
            Some(other) => {
                tracing::debug!(source = %other, "ignoring non-object _source");
            }
        }

        for (key, value) in found.iter_mut() {
            if self.catalog.is_nested(key) {
                continue;
            }
            if let Value::Array(items) = value {
                if items.len() <= 1 {
                    *value = items.pop().unwrap_or(Value::Null);
                }
            }
        }

        if !self.plan.output.flatten_nested {
            if let Some(inner) = &hit.inner_hits {
                for (path, section) in inner {
                    if !self.plan.queries_path(path) {
                        tracing::debug!(path = %path, "ignoring inner hits for unrequested path");
                        continue;
                    }
                    let Some(hits) = RawInnerHits::from_section(section) else {
                        tracing::debug!(path = %path, section = %section, "skipping malformed inner hits");
                        continue;
                    };
                    found.insert(path.clone(), self.inner_documents(path, &hits));
                    stats.inner_hit_groups += 1;
                }
            }
        }

        for field in &self.plan.projection.requested_fields {
            if found.contains_key(field) {
                continue;
            }
            let path_present = self
                .catalog
                .nested_path(field)
                .map(|path| found.contains_key(path))
                .unwrap_or(false);
            if !path_present {
                found.insert(field.clone(), Value::Null);
                stats.null_fields += 1;
            }
        }

        if self.plan.output.keys_nested {
            nest_dotted(found)
        } else {
            found
        }
    }

    fn inner_documents(&self, path: &str, inner: &RawInnerHits) -> Value {
        let keep = self.plan.projection.nested_filter(path);
        let docs = inner
            .hits
            .hits
            .iter()
            .map(|hit| {
                let doc = hit.source.as_ref().map(flatten_dotted).unwrap_or_default();
                let doc = match keep {
                    Some(keys) => doc
                        .into_iter()
                        .filter(|(k, _)| keys.iter().any(|key| key == k))
                        .collect(),
                    None => doc,
                };
                Value::Object(doc)
            })
            .collect();
        Value::Array(docs)
    }
}
