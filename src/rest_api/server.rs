//! # REST API HTTP Server
//!
//! Axum router for the compile/decode service.
//!
//! - `GET /health`
//! - `GET /metrics`
//! - `GET /v1/compile?<query string>` compiled engine request body
//! - `GET /v1/search?<query string>` full search through the client
//! - `POST /v1/decode` with `{"query": "...", "response": {...}}`
//! - `POST /admin/reload-catalog`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::search::{SearchClient, SearchService};

use super::errors::RestResult;
use super::parser::parse_query_string;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /v1/decode` body
#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    /// Query string the response was requested with
    #[serde(default)]
    pub query: String,
    /// Raw engine response
    pub response: Value,
}

/// HTTP front end over a search service
pub struct RestServer<C: SearchClient> {
    service: SearchService<C>,
    catalog_path: PathBuf,
    cors_origins: Vec<String>,
}

/// Shared state type
type ServerState<C> = Arc<RestServer<C>>;

impl<C: SearchClient + 'static> RestServer<C> {
    pub fn new(service: SearchService<C>, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            service,
            catalog_path: catalog_path.into(),
            cors_origins: Vec::new(),
        }
    }

    /// Restricts CORS to these origins; none allows any
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let cors = if self.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = self
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let state = Arc::new(self);
        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler::<C>))
            .route("/v1/compile", get(compile_handler::<C>))
            .route("/v1/search", get(search_handler::<C>))
            .route("/v1/decode", post(decode_handler::<C>))
            .route("/admin/reload-catalog", post(reload_handler::<C>))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }

    /// Binds and serves until the process stops
    pub async fn serve(self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "nestsearch listening");
        axum::serve(listener, self.router()).await
    }
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn metrics_handler<C: SearchClient + 'static>(
    State(server): State<ServerState<C>>,
) -> impl IntoResponse {
    Json(server.service.metrics().snapshot())
}

async fn compile_handler<C: SearchClient + 'static>(
    State(server): State<ServerState<C>>,
    RawQuery(query): RawQuery,
) -> RestResult<Json<Value>> {
    let request = parse_query_string(query.as_deref().unwrap_or_default())?;
    let plan = server.service.compile(&request)?;
    Ok(Json(plan.to_request_body()))
}

async fn search_handler<C: SearchClient + 'static>(
    State(server): State<ServerState<C>>,
    RawQuery(query): RawQuery,
) -> RestResult<Json<Value>> {
    let request = parse_query_string(query.as_deref().unwrap_or_default())?;
    let result = server.service.search(&request)?;
    Ok(Json(result.to_json()))
}

async fn decode_handler<C: SearchClient + 'static>(
    State(server): State<ServerState<C>>,
    Json(body): Json<DecodeRequest>,
) -> RestResult<Json<Value>> {
    let request = parse_query_string(&body.query)?;
    let result = server.service.decode(&request, body.response)?;
    Ok(Json(result.to_json()))
}

async fn reload_handler<C: SearchClient + 'static>(
    State(server): State<ServerState<C>>,
) -> RestResult<Json<Value>> {
    let catalog = server.service.catalog().reload(&server.catalog_path)?;
    server.service.metrics().increment_catalog_reloads();
    Ok(Json(json!({
        "status": "reloaded",
        "fields": catalog.field_count(),
        "nested_paths": catalog.nested_paths().len(),
    })))
}
