//! Search engine client seam
//!
//! The engine itself is an external collaborator. The facade only needs
//! something that takes a compiled body and returns the raw JSON reply.

use std::sync::Mutex;

use serde_json::{json, Value};

use super::errors::ClientError;

/// One outgoing engine call
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    pub index: String,
    pub body: Value,
    /// Only hit counts (and aggregations) are needed
    pub count_only: bool,
}

/// Executes compiled requests against a search engine
pub trait SearchClient: Send + Sync {
    fn execute(&self, request: &EngineRequest) -> Result<Value, ClientError>;
}

/// Client that answers every request with the same response
#[derive(Debug)]
pub struct StaticClient {
    response: Value,
    last_request: Mutex<Option<EngineRequest>>,
}

impl StaticClient {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            last_request: Mutex::new(None),
        }
    }

    /// Client whose response has no hits
    pub fn empty() -> Self {
        Self::new(json!({ "took": 0, "hits": { "total": 0, "hits": [] } }))
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<EngineRequest> {
        match self.last_request.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SearchClient for StaticClient {
    fn execute(&self, request: &EngineRequest) -> Result<Value, ClientError> {
        match self.last_request.lock() {
            Ok(mut guard) => *guard = Some(request.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(request.clone()),
        }
        Ok(self.response.clone())
    }
}
