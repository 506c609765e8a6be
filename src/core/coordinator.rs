//! Import orchestration
//!
//! The coordinator drives one import end to end:
//!
//! ```text
//! SourceGateway::open
//!     → RecordParser stream (read to the end)
//!     → CategoryReconciler (lookup + batch create)
//!     → bind records to categories
//!     → StorageGateway::create_transactions
//!     → SourceGateway::delete_after_import
//! ```
//!
//! Nothing touches storage until the parser stream has ended, so dropping
//! the import future before that point leaves storage and the source as
//! they were. A row with an unreadable type or value stops the import at
//! that row, before storage is touched.
//! Any failure before the last step keeps the source in place.

use crate::core::reconciler::CategoryReconciler;
use crate::core::traits::{SourceGateway, StorageGateway};
use crate::io::record_parser::{RecordParser, DEFAULT_DELIMITER};
use crate::types::{CandidateRecord, Category, ImportError, Transaction, TransactionDraft};
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;

/// Records read from one input, with the category name of each
#[derive(Debug, Default)]
struct Buffered {
    records: Vec<CandidateRecord>,
    category_names: Vec<String>,
}

/// Imports delimited transaction files into storage
pub struct ImportCoordinator<S, G> {
    storage: Arc<S>,
    source: Arc<G>,
    reconciler: CategoryReconciler<S>,
    delimiter: u8,
}

impl<S: StorageGateway, G: SourceGateway> ImportCoordinator<S, G> {
    /// Create a coordinator reading comma-separated input
    pub fn new(storage: Arc<S>, source: Arc<G>) -> Self {
        let reconciler = CategoryReconciler::new(Arc::clone(&storage));
        Self {
            storage,
            source,
            reconciler,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Import every valid row of the file at `path`
    ///
    /// Returns the persisted transactions in the order their rows appeared.
    /// On success the input is deleted.
    ///
    /// # Errors
    ///
    /// - [`ImportError::SourceUnavailable`] if the input cannot be opened or read
    /// - [`ImportError::InvalidRecord`] if a row has an unreadable type or value
    /// - [`ImportError::ReconciliationFailure`] if categories cannot be resolved
    /// - [`ImportError::UnresolvedCategoryReference`] if a record has no category
    /// - [`ImportError::PersistenceFailure`] if the transaction batch fails
    /// - [`ImportError::SourceCleanupFailure`] if the input cannot be deleted;
    ///   the transactions are already stored at that point
    pub async fn import_transactions(&self, path: &str) -> Result<Vec<Transaction>, ImportError> {
        let reader = self
            .source
            .open(path)
            .await
            .map_err(|e| ImportError::source_unavailable(path, e))?;

        let buffered = buffer_records(path, RecordParser::new(reader, self.delimiter)).await?;
        tracing::debug!(path, records = buffered.records.len(), "input read to the end");

        let pool = self.reconciler.reconcile(&buffered.category_names).await?;
        let drafts = bind_records(buffered.records, &pool)?;

        let transactions = if drafts.is_empty() {
            Vec::new()
        } else {
            self.storage
                .create_transactions(drafts)
                .await
                .map_err(ImportError::persistence_failure)?
        };

        self.source
            .delete_after_import(path)
            .await
            .map_err(|e| ImportError::source_cleanup_failure(path, e))?;

        tracing::info!(path, transactions = transactions.len(), "import finished");
        Ok(transactions)
    }
}

/// Read the parser stream to its end
///
/// This is the only point where the import waits on the source. The first
/// error ends the read.
async fn buffer_records<R>(path: &str, parser: RecordParser<R>) -> Result<Buffered, ImportError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let stream = parser.into_stream();
    futures::pin_mut!(stream);

    let mut buffered = Buffered::default();
    while let Some(item) = stream.next().await {
        let record = item.map_err(|e| ImportError::from_record_error(path, e))?;
        buffered.category_names.push(record.category_name.clone());
        buffered.records.push(record);
    }

    Ok(buffered)
}

/// Attach each record to the first category in `pool` with the same title
///
/// # Errors
///
/// Returns [`ImportError::UnresolvedCategoryReference`] for the first record
/// whose category name matches nothing in `pool`.
pub fn bind_records(
    records: Vec<CandidateRecord>,
    pool: &[Category],
) -> Result<Vec<TransactionDraft>, ImportError> {
    let mut by_title: HashMap<&str, &Category> = HashMap::with_capacity(pool.len());
    for category in pool {
        by_title.entry(category.title.as_str()).or_insert(category);
    }

    records
        .into_iter()
        .map(|record| -> Result<TransactionDraft, ImportError> {
            let category = by_title
                .get(record.category_name.as_str())
                .map(|category| (*category).clone())
                .ok_or_else(|| {
                    ImportError::unresolved_category(&record.title, &record.category_name)
                })?;

            Ok(TransactionDraft {
                title: record.title,
                kind: record.kind,
                amount: record.amount,
                category,
            })
        })
        .collect()
}
