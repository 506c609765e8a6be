//! CSV format handling for imported rows and transaction output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Positional conversion from a raw CSV row to a [`CandidateRecord`]
//! - Transaction output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    CandidateRecord, CategoryId, ImportError, RecordError, Transaction, TransactionId,
    TransactionKind,
};
use csv_async::StringRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Column positions of the input file: title, type, value, category
const TITLE: usize = 0;
const KIND: usize = 1;
const AMOUNT: usize = 2;
const CATEGORY: usize = 3;

/// Header written in front of imported transactions
pub const OUTPUT_HEADER: [&str; 6] = ["id", "title", "type", "value", "category_id", "category"];

/// One line of transaction output
#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    id: TransactionId,
    title: &'a str,
    #[serde(rename = "type")]
    kind: TransactionKind,
    value: Decimal,
    category_id: CategoryId,
    category: &'a str,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            id: transaction.id,
            title: &transaction.title,
            kind: transaction.kind,
            value: transaction.amount,
            category_id: transaction.category.id,
            category: &transaction.category.title,
        }
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

/// Convert a raw CSV row to a CandidateRecord
///
/// Fields are mapped by position and trimmed. Returns `Ok(None)` when the
/// title, type or value is missing. A missing category cell becomes an
/// empty category name, which is kept as is.
///
/// # Errors
///
/// Returns [`RecordError::Invalid`] when the type is not exactly `income`
/// or `outcome`, or the value is not a decimal number.
pub fn convert_string_record(
    record: &StringRecord,
) -> Result<Option<CandidateRecord>, RecordError> {
    let line = record.position().map(|pos| pos.line()).unwrap_or_default();
    let title = field(record, TITLE);
    let kind = field(record, KIND);
    let amount = field(record, AMOUNT);

    if title.is_empty() || kind.is_empty() || amount.is_empty() {
        tracing::debug!(line, "skipping row without title, type or value");
        return Ok(None);
    }

    let kind =
        TransactionKind::parse(kind).ok_or_else(|| RecordError::invalid(line, "type", kind))?;
    let amount =
        Decimal::from_str(amount).map_err(|_| RecordError::invalid(line, "value", amount))?;

    Ok(Some(CandidateRecord {
        title: title.to_string(),
        kind,
        amount,
        category_name: field(record, CATEGORY).to_string(),
    }))
}

/// Write imported transactions to CSV format
///
/// Writes transactions in the order given, with columns:
/// id, title, type, value, category_id, category
///
/// The header is written even when there are no transactions.
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), ImportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(OUTPUT_HEADER)?;

    for transaction in transactions {
        writer.serialize(TransactionRow::from(transaction))?;
    }

    writer.flush()?;

    Ok(())
}
