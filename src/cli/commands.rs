//! CLI command implementations
//!
//! `compile`, `explain` and `decode` are one-shot: load config and catalog,
//! run, print one JSON document. `serve` boots the HTTP API.

use std::path::Path;

use serde_json::{json, Value};

use crate::catalog::CatalogHandle;
use crate::planner::{ExplainPlan, QueryPlanner};
use crate::rest_api::{parse_query_string, RestServer};
use crate::search::{SearchService, StaticClient};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_error, write_response};

/// Parse arguments, run the command, print its output
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a command and print its JSON envelope
pub fn run_command(cmd: Command) -> CliResult<()> {
    let outcome = match cmd {
        Command::Compile { config, query } => compile(&config, &query),
        Command::Explain { config, query } => explain(&config, &query),
        Command::Decode {
            config,
            query,
            response,
        } => decode(&config, &query, response.as_deref()),
        Command::Serve { config, response } => {
            return serve(&config, response.as_deref());
        }
    };

    match outcome {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Builds the search service a command runs against
fn open_service(config: &Config, client: StaticClient) -> CliResult<SearchService<StaticClient>> {
    let catalog = CatalogHandle::open(&config.catalog_file())?;
    Ok(SearchService::new(catalog, client, config.planner_config()?).with_index(&config.index))
}

/// Compiled engine request body for a query string
pub fn compile(config_path: &Path, query: &str) -> CliResult<Value> {
    let config = Config::load(config_path)?;
    let service = open_service(&config, StaticClient::empty())?;

    let request = parse_query_string(query)?;
    let plan = service.compile(&request)?;

    Ok(json!({
        "index": config.index,
        "count_only": plan.count_only,
        "body": plan.to_request_body(),
    }))
}

/// Explain plan for a query string. Rejections are reported, not raised.
pub fn explain(config_path: &Path, query: &str) -> CliResult<Value> {
    let config = Config::load(config_path)?;
    let catalog = CatalogHandle::open(&config.catalog_file())?.snapshot();
    let planner = QueryPlanner::new(&catalog, config.planner_config()?);

    let explain = match parse_query_string(query)
        .and_then(|request| planner.plan(&request.params, &request.options))
    {
        Ok(plan) => ExplainPlan::from_plan(&plan),
        Err(err) => ExplainPlan::from_error(&err),
    };

    Ok(json!({
        "plan": serde_json::to_value(&explain)?,
        "text": explain.to_string(),
    }))
}

/// Decoded result envelope for a raw engine response
pub fn decode(config_path: &Path, query: &str, response: Option<&Path>) -> CliResult<Value> {
    let config = Config::load(config_path)?;
    let service = open_service(&config, StaticClient::empty())?;

    let request = parse_query_string(query)?;
    let raw = read_document(response)?;
    let result = service.decode(&request, raw)?;

    Ok(result.to_json())
}

/// Start the HTTP server
///
/// `/v1/search` answers from `response` (or an empty result set); the
/// compile and decode routes need no engine.
pub fn serve(config_path: &Path, response: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let client = match response {
        Some(path) => StaticClient::new(read_document(Some(path))?),
        None => StaticClient::empty(),
    };
    let service = open_service(&config, client)?;
    let addr = config.socket_addr()?;

    let server = RestServer::new(service, config.catalog_file())
        .with_cors_origins(config.cors_origins.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .serve(addr)
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
