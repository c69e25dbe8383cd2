//! CLI module for nestsearch
//!
//! Provides command-line interface for:
//! - compile: Print the engine request for a query string
//! - explain: Print how a query string compiles
//! - decode: Decode a raw engine response
//! - serve: Run the HTTP compile/decode API

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compile, decode, explain, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_response};
