use crate::runner::ImportConfig;
use clap::Parser;
use std::path::PathBuf;

/// Import a delimited transactions file into the ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-import")]
#[command(about = "Import transactions and their categories from a delimited file", long_about = None)]
pub struct CliArgs {
    /// Input file path containing one header line and transaction rows
    #[arg(value_name = "INPUT", help = "Path to the file to import (deleted after a successful import)")]
    pub input_file: PathBuf,

    /// SQLite database receiving categories and transactions
    #[arg(
        long = "database",
        value_name = "PATH",
        default_value = "ledger.db",
        help = "SQLite database file (created if missing)"
    )]
    pub database: PathBuf,

    /// Field delimiter of the input file
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        default_value_t = ',',
        help = "Single ASCII field delimiter (default: ',')"
    )]
    pub delimiter: char,

    /// Number of runtime worker threads
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of async runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,
}

impl CliArgs {
    /// Create an ImportConfig from CLI arguments
    ///
    /// Invalid values fall back to defaults with a warning.
    pub fn to_import_config(&self) -> ImportConfig {
        let default = ImportConfig::default();
        ImportConfig::new(
            self.delimiter,
            self.worker_threads.unwrap_or(default.worker_threads),
        )
    }
}
