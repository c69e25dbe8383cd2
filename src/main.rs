//! nestsearch CLI entry point
//!
//! Installs logging, then delegates everything to `cli::run`. Errors are
//! printed to stderr and exit non-zero.

use nestsearch::{cli, observability};

fn main() {
    observability::init_logging();
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
