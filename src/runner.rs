//! Command-line import runner
//!
//! Wires the file-system source and the SQLite store into an
//! [`ImportCoordinator`], runs one import on a tokio runtime and writes the
//! created transactions to the given output as CSV.
//!
//! # Architecture
//!
//! ```text
//! run
//!     ├── ImportConfig (delimiter, worker_threads)
//!     ├── FsSource (input file, removed on success)
//!     ├── SqliteStorage (categories + transactions)
//!     └── ImportCoordinator
//!             └── write_transactions_csv → output
//! ```

use crate::cli::CliArgs;
use crate::core::ImportCoordinator;
use crate::gateway::{FsSource, SqliteStorage};
use crate::io::csv_format::write_transactions_csv;
use crate::io::record_parser::DEFAULT_DELIMITER;
use crate::types::ImportError;
use std::io::Write;
use std::sync::Arc;

/// Configuration for one import run
#[derive(Clone, Debug)]
pub struct ImportConfig {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Number of tokio worker threads
    pub worker_threads: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            worker_threads: num_cpus::get(),
        }
    }
}

impl ImportConfig {
    /// Create a new ImportConfig with custom values
    ///
    /// The delimiter must be a single ASCII character other than a line
    /// break or a double quote.
    pub fn new(delimiter: char, worker_threads: usize) -> Self {
        let default = Self::default();

        let delimiter = match u8::try_from(delimiter) {
            Ok(byte) if byte.is_ascii() && !matches!(byte, b'\n' | b'\r' | b'"') => byte,
            _ => {
                tracing::warn!(
                    ?delimiter,
                    default = %char::from(default.delimiter),
                    "invalid delimiter, using default"
                );
                default.delimiter
            }
        };

        let worker_threads = if worker_threads == 0 {
            tracing::warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            delimiter,
            worker_threads,
        }
    }
}

/// Import the file named by `args` and write the created transactions
///
/// # Errors
///
/// Returns the import's error, [`ImportError::StorageUnavailable`] if the
/// database cannot be opened, or [`ImportError::IoError`] if the runtime
/// cannot start or the output cannot be written.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), ImportError> {
    let config = args.to_import_config();

    let path = args.input_file.to_str().ok_or_else(|| {
        ImportError::source_unavailable(
            &args.input_file.to_string_lossy(),
            "path is not valid UTF-8",
        )
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()?;

    let transactions = runtime.block_on(async {
        let storage =
            SqliteStorage::open(&args.database).map_err(ImportError::storage_unavailable)?;

        let coordinator = ImportCoordinator::new(Arc::new(storage), Arc::new(FsSource))
            .with_delimiter(config.delimiter);

        coordinator.import_transactions(path).await
    })?;

    write_transactions_csv(&transactions, output)
}
