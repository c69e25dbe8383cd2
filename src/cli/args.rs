//! CLI argument definitions using clap
//!
//! Commands:
//! - nestsearch compile --config <path> --query <query string>
//! - nestsearch explain --config <path> --query <query string>
//! - nestsearch decode --config <path> --query <query string> [--response <file>]
//! - nestsearch serve --config <path> [--response <file>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nestsearch - compiles URL search parameters into nested-aware engine queries
#[derive(Parser, Debug)]
#[command(name = "nestsearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the engine request body for a query string
    Compile {
        /// Path to configuration file
        #[arg(long, default_value = "./nestsearch.json")]
        config: PathBuf,

        /// URL query string, e.g. "school.state=CA&_fields=id"
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Print a readable summary of how a query string compiles
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./nestsearch.json")]
        config: PathBuf,

        /// URL query string
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Decode a raw engine response (file or stdin) for a query string
    Decode {
        /// Path to configuration file
        #[arg(long, default_value = "./nestsearch.json")]
        config: PathBuf,

        /// URL query string the response was requested with
        #[arg(long, default_value = "")]
        query: String,

        /// Raw engine response; stdin when omitted
        #[arg(long)]
        response: Option<PathBuf>,
    },

    /// Serve the HTTP compile/decode API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./nestsearch.json")]
        config: PathBuf,

        /// Canned engine response answered by /v1/search
        #[arg(long)]
        response: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
