//! Error types for the ledger importer
//!
//! This module defines the errors raised by the import pipeline and by the
//! gateways it talks to. Errors carry enough context to be printed as-is by
//! the CLI.
//!
//! # Error Categories
//!
//! - **Source Errors**: the input file cannot be opened, read or removed
//! - **Storage Errors**: duplicate category titles, backend failures
//! - **Record Errors**: a row whose type or value cannot be read
//! - **Import Errors**: the fatal outcomes of one import run
//!
//! A row missing its title, type or value is not an error at all: the
//! parser drops it and moves on. A row that has them but cannot be read
//! fails the whole import, so the input is kept for correction.

use thiserror::Error;

/// Errors reported by a source gateway
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// Nothing exists at the requested path
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// The source exists but could not be opened, read or removed
    #[error("I/O error on {path}: {message}")]
    Io {
        /// The path being accessed
        path: String,
        /// Description of the I/O error
        message: String,
    },
}

impl SourceError {
    /// Classify an `io::Error` raised while accessing `path`
    pub fn from_io(path: &str, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound {
                path: path.to_string(),
            }
        } else {
            SourceError::Io {
                path: path.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Errors yielded by the record parser stream
#[derive(Debug, Error)]
pub enum RecordError {
    /// The underlying byte stream could not be read or decoded
    #[error(transparent)]
    Read(#[from] csv_async::Error),

    /// A required field is present but cannot be read
    #[error("Invalid {field} '{value}' on line {line}")]
    Invalid {
        /// Line of the offending row (1-based, header included)
        line: u64,
        /// Column name: `type` or `value`
        field: &'static str,
        /// The trimmed cell content
        value: String,
    },
}

impl RecordError {
    /// Create an Invalid error
    pub fn invalid(line: u64, field: &'static str, value: &str) -> Self {
        RecordError::Invalid {
            line,
            field,
            value: value.to_string(),
        }
    }
}

/// Errors reported by a storage gateway
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// A category with this title already exists
    ///
    /// Batch creation is all-or-nothing, so when this is returned no
    /// category from the batch was written. Callers may re-query and retry.
    #[error("Category '{title}' already exists")]
    DuplicateCategory {
        /// The conflicting title
        title: String,
    },

    /// Any other failure of the storage backend
    #[error("Storage error: {message}")]
    Backend {
        /// Description of the failure
        message: String,
    },
}

impl StorageError {
    /// Create a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        StorageError::Backend {
            message: message.into(),
        }
    }
}

/// Fatal outcome of an import run
///
/// Whenever one of these is returned nothing was deleted from the source,
/// and no transaction from the run was persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// The input could not be opened or read to the end
    #[error("Source unavailable: {path}: {message}")]
    SourceUnavailable {
        /// Path of the input
        path: String,
        /// Description of the failure
        message: String,
    },

    /// A row has a type or value that cannot be read
    ///
    /// Raised after the whole input has been read and before storage is
    /// touched. Nothing is persisted and the input is kept.
    #[error("Invalid {field} '{value}' on line {line}")]
    InvalidRecord {
        /// Line of the offending row (1-based, header included)
        line: u64,
        /// Column name: `type` or `value`
        field: String,
        /// The trimmed cell content
        value: String,
    },

    /// Category lookup or batch creation failed
    ///
    /// Raised before any transaction is written.
    #[error("Category reconciliation failed: {message}")]
    ReconciliationFailure {
        /// Description of the failure
        message: String,
    },

    /// Transaction batch creation failed
    ///
    /// Categories created earlier in the same run stay persisted; re-running
    /// the import reuses them.
    #[error("Failed to persist transactions: {message}")]
    PersistenceFailure {
        /// Description of the failure
        message: String,
    },

    /// A record references a category missing from the resolved pool
    #[error("Transaction '{title}' references unresolved category '{category}'")]
    UnresolvedCategoryReference {
        /// Title of the offending record
        title: String,
        /// Category name that could not be resolved
        category: String,
    },

    /// The transactions were stored but the input could not be removed
    ///
    /// The import itself is complete. The input must be removed by hand
    /// before the next run, or its rows are imported a second time.
    #[error("Transactions stored but {path} could not be removed: {message}")]
    SourceCleanupFailure {
        /// Path of the input
        path: String,
        /// Description of the failure
        message: String,
    },

    /// The storage backend could not be opened
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// Description of the failure
        message: String,
    },

    /// I/O error outside the import itself (runtime setup, writing output)
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },
}

// Conversion from io::Error to ImportError
impl From<std::io::Error> for ImportError {
    fn from(error: std::io::Error) -> Self {
        ImportError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ImportError (output serialization)
impl From<csv::Error> for ImportError {
    fn from(error: csv::Error) -> Self {
        ImportError::IoError {
            message: error.to_string(),
        }
    }
}

impl ImportError {
    /// Create a SourceUnavailable error
    pub fn source_unavailable(path: &str, message: impl ToString) -> Self {
        ImportError::SourceUnavailable {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a SourceCleanupFailure error
    pub fn source_cleanup_failure(path: &str, error: SourceError) -> Self {
        ImportError::SourceCleanupFailure {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    /// Map a parser stream error raised while reading `path`
    pub fn from_record_error(path: &str, error: RecordError) -> Self {
        match error {
            RecordError::Read(e) => ImportError::source_unavailable(path, e),
            RecordError::Invalid { line, field, value } => ImportError::InvalidRecord {
                line,
                field: field.to_string(),
                value,
            },
        }
    }

    /// Create a ReconciliationFailure error
    pub fn reconciliation_failure(error: StorageError) -> Self {
        ImportError::ReconciliationFailure {
            message: error.to_string(),
        }
    }

    /// Create a PersistenceFailure error
    pub fn persistence_failure(error: StorageError) -> Self {
        ImportError::PersistenceFailure {
            message: error.to_string(),
        }
    }

    /// Create a StorageUnavailable error
    pub fn storage_unavailable(error: StorageError) -> Self {
        ImportError::StorageUnavailable {
            message: error.to_string(),
        }
    }

    /// Create an UnresolvedCategoryReference error
    pub fn unresolved_category(title: &str, category: &str) -> Self {
        ImportError::UnresolvedCategoryReference {
            title: title.to_string(),
            category: category.to_string(),
        }
    }
}
