//! Ledger Import CLI
//!
//! Command-line interface for importing transactions from delimited files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv > imported.csv
//! cargo run -- --database books.db transactions.csv
//! cargo run -- --delimiter ';' --worker-threads 2 transactions.csv
//! RUST_LOG=ledger_import=debug cargo run -- transactions.csv
//! ```
//!
//! The program imports the input file into the SQLite database, writes the
//! created transactions to stdout and removes the input file. Logs go to
//! stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, database unavailable, storage failure, etc.)

use ledger_import::cli;
use ledger_import::runner;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ledger_import=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = runner::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
