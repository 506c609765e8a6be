//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `category`: Category entity
//! - `transaction`: Candidate records, drafts and persisted transactions
//! - `error`: Error types for the import pipeline and its gateways

pub mod category;
pub mod error;
pub mod transaction;

pub use category::{Category, CategoryId};
pub use error::{ImportError, RecordError, SourceError, StorageError};
pub use transaction::{
    CandidateRecord, Transaction, TransactionDraft, TransactionId, TransactionKind,
};
