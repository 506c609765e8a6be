//! Gateway traits consumed by the import pipeline
//!
//! The pipeline never talks to a database or a file system directly. It goes
//! through these two traits so that the same coordinator runs against SQLite,
//! an in-memory store, or anything else that honours the contracts below.

use crate::types::{Category, SourceError, StorageError, Transaction, TransactionDraft};
use async_trait::async_trait;
use futures::io::AsyncRead;
use std::collections::HashSet;

/// Trait for the durable store of categories and transactions
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Return every stored category whose title is in `titles`
    async fn find_categories_by_titles(
        &self,
        titles: &HashSet<String>,
    ) -> Result<Vec<Category>, StorageError>;

    /// Create one category per title, all or nothing
    ///
    /// Must fail with [`StorageError::DuplicateCategory`] without writing
    /// anything if a title already exists in storage or appears twice in
    /// `titles`.
    async fn create_categories(&self, titles: &[String]) -> Result<Vec<Category>, StorageError>;

    /// Persist a batch of transactions, all or nothing
    ///
    /// Every draft's category must already exist in storage. The returned
    /// transactions keep the order of `drafts`.
    async fn create_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, StorageError>;
}

/// Trait for the origin of import files
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// Byte stream handed to the record parser
    type Reader: AsyncRead + Unpin + Send + 'static;

    /// Open the input at `path` for reading
    async fn open(&self, path: &str) -> Result<Self::Reader, SourceError>;

    /// Remove the input once everything it described is stored
    async fn delete_after_import(&self, path: &str) -> Result<(), SourceError>;
}
