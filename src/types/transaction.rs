//! Transaction-related types for the ledger importer
//!
//! This module defines the transaction kind, the transient candidate record
//! produced by the parser, the draft handed to storage and the persisted
//! transaction returned to callers.

use super::category::Category;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Transaction identifier
pub type TransactionId = Uuid;

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    Income,

    /// Money going out
    Outcome,
}

impl TransactionKind {
    /// Lowercase name used in input files and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Outcome => "outcome",
        }
    }

    /// Parse a kind from its exact lowercase name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionKind::Income),
            "outcome" => Some(TransactionKind::Outcome),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed row that has not been persisted yet
///
/// Lives only for the duration of one import call.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Non-empty, trimmed title
    pub title: String,

    /// Income or outcome
    pub kind: TransactionKind,

    /// Transaction value
    pub amount: Decimal,

    /// Trimmed category title, possibly empty
    pub category_name: String,
}

/// A transaction bound to a resolved category, ready for batch creation
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub title: String,
    pub kind: TransactionKind,
    pub amount: Decimal,

    /// Category that already exists in storage
    pub category: Category,
}

/// A persisted transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Storage-assigned identity
    pub id: TransactionId,
    pub title: String,
    pub kind: TransactionKind,
    pub amount: Decimal,

    /// The category this transaction belongs to
    pub category: Category,
}

impl Transaction {
    /// Assign an identity to a draft
    pub fn from_draft(draft: TransactionDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
        }
    }
}
