//! In-process gateways
//!
//! `MemoryStorage` keeps categories and transactions in vectors behind an
//! async mutex and applies the same rules as the SQLite store: titles are
//! unique, batches are all-or-nothing, and a transaction can only reference
//! a category that exists. `MemorySource` serves import files from a map of
//! path to bytes.

use crate::core::traits::{SourceGateway, StorageGateway};
use crate::types::{Category, SourceError, StorageError, Transaction, TransactionDraft};
use async_trait::async_trait;
use futures::io::Cursor;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

/// Storage gateway backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds one category per title
    pub fn with_categories(titles: &[&str]) -> Self {
        let categories = titles.iter().map(|title| Category::new(*title)).collect();
        Self {
            state: Mutex::new(MemoryState {
                categories,
                transactions: Vec::new(),
            }),
        }
    }

    /// Snapshot of stored categories, in creation order
    pub async fn categories(&self) -> Vec<Category> {
        self.state.lock().await.categories.clone()
    }

    /// Snapshot of stored transactions, in creation order
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.transactions.clone()
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn find_categories_by_titles(
        &self,
        titles: &HashSet<String>,
    ) -> Result<Vec<Category>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .categories
            .iter()
            .filter(|category| titles.contains(&category.title))
            .cloned()
            .collect())
    }

    async fn create_categories(&self, titles: &[String]) -> Result<Vec<Category>, StorageError> {
        let mut state = self.state.lock().await;

        let mut taken: HashSet<&str> = state.categories.iter().map(|c| c.title.as_str()).collect();
        for title in titles {
            if !taken.insert(title.as_str()) {
                return Err(StorageError::DuplicateCategory {
                    title: title.clone(),
                });
            }
        }

        let created: Vec<Category> = titles.iter().map(Category::new).collect();
        state.categories.extend(created.iter().cloned());
        Ok(created)
    }

    async fn create_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, StorageError> {
        let mut state = self.state.lock().await;

        let known: HashSet<_> = state.categories.iter().map(|c| c.id).collect();
        if let Some(orphan) = drafts.iter().find(|d| !known.contains(&d.category.id)) {
            return Err(StorageError::backend(format!(
                "category '{}' ({}) does not exist",
                orphan.category.title, orphan.category.id
            )));
        }

        let created: Vec<Transaction> = drafts.into_iter().map(Transaction::from_draft).collect();
        state.transactions.extend(created.iter().cloned());
        Ok(created)
    }
}

/// Source gateway serving files from memory
#[derive(Debug, Default)]
pub struct MemorySource {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySource {
    /// Create a source with no files
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path`
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files
            .get_mut()
            .insert(path.to_string(), content.into());
        self
    }

    /// Whether a file is still present at `path`
    pub async fn contains(&self, path: &str) -> bool {
        self.files.lock().await.contains_key(path)
    }
}

#[async_trait]
impl SourceGateway for MemorySource {
    type Reader = Cursor<Vec<u8>>;

    async fn open(&self, path: &str) -> Result<Self::Reader, SourceError> {
        let files = self.files.lock().await;
        files
            .get(path)
            .map(|content| Cursor::new(content.clone()))
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_string(),
            })
    }

    async fn delete_after_import(&self, path: &str) -> Result<(), SourceError> {
        match self.files.lock().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(SourceError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}
