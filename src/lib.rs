//! Ledger Import Library
//! # Overview
//!
//! This library imports a delimited file of financial transactions, creating
//! every category the file mentions that storage does not already hold, and
//! persisting the transactions bound to those categories in bulk.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Category, Transaction, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Import pipeline:
//!   - [`core::traits`] - Storage and source gateway abstractions
//!   - [`core::reconciler`] - Existing-vs-new category detection
//!   - [`core::coordinator`] - End-to-end import orchestration
//! - [`io`] - Streaming record parser and CSV output
//! - [`gateway`] - File-system, in-memory and SQLite adapters
//! - [`runner`] - Command-line wiring of the above
//!
//! # Input Format
//!
//! One header line followed by rows mapped by position:
//!
//! ```text
//! title,type,value,category
//! Salary,income,1000,Job
//! Lunch,outcome,20,Food
//! ```
//!
//! Every field is trimmed. Rows missing a title, type or value are skipped.
//! A type other than `income`/`outcome`, or a value that is not a decimal
//! number, fails the import and keeps the input. The input is deleted once
//! its transactions are stored.

// Module declarations
pub mod cli;
pub mod core;
pub mod gateway;
pub mod io;
pub mod runner;
pub mod types;

pub use crate::core::{CategoryReconciler, ImportCoordinator, SourceGateway, StorageGateway};
pub use io::write_transactions_csv;
pub use types::{
    CandidateRecord, Category, ImportError, RecordError, SourceError, StorageError, Transaction,
    TransactionDraft, TransactionKind,
};
