//! Category reconciliation
//!
//! Splits the category names referenced by an import into titles that
//! already exist in storage and titles that must be created, then creates
//! the missing ones in a single batch.
//!
//! # Concurrent imports
//!
//! Two imports running against the same storage can both decide to create
//! the same new title. Storage rejects the second batch with
//! [`StorageError::DuplicateCategory`] and writes nothing from it; the
//! reconciler then re-queries and retries with the titles that are still
//! missing, up to [`MAX_RECONCILE_ATTEMPTS`] times.

use crate::core::traits::StorageGateway;
use crate::types::{Category, ImportError, StorageError};
use std::collections::HashSet;
use std::sync::Arc;

/// Number of lookup/create rounds before a duplicate-title race is fatal
pub const MAX_RECONCILE_ATTEMPTS: usize = 3;

/// Resolves category names to persisted categories
#[derive(Debug, Clone)]
pub struct CategoryReconciler<S> {
    storage: Arc<S>,
}

impl<S: StorageGateway> CategoryReconciler<S> {
    /// Create a new CategoryReconciler over the given storage
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Build the resolved category pool for `names`
    ///
    /// `names` may contain duplicates and empty strings. The returned pool
    /// lists newly created categories first, then the ones that already
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ReconciliationFailure`] if the lookup fails, if
    /// batch creation fails, or if a duplicate-title race persists after
    /// [`MAX_RECONCILE_ATTEMPTS`] rounds.
    pub async fn reconcile(&self, names: &[String]) -> Result<Vec<Category>, ImportError> {
        let distinct = distinct_titles(names);
        if distinct.is_empty() {
            return Ok(Vec::new());
        }

        let wanted: HashSet<String> = distinct.iter().cloned().collect();
        let mut attempt = 1;

        loop {
            let existing = self
                .storage
                .find_categories_by_titles(&wanted)
                .await
                .map_err(ImportError::reconciliation_failure)?;

            let to_create = titles_to_create(&distinct, &existing);
            if to_create.is_empty() {
                return Ok(existing);
            }

            match self.storage.create_categories(&to_create).await {
                Ok(mut created) => {
                    tracing::debug!(
                        created = created.len(),
                        existing = existing.len(),
                        "categories reconciled"
                    );
                    created.extend(existing);
                    return Ok(created);
                }
                Err(StorageError::DuplicateCategory { title }) if attempt < MAX_RECONCILE_ATTEMPTS => {
                    tracing::warn!(%title, attempt, "category created concurrently, re-querying");
                    attempt += 1;
                }
                Err(e) => return Err(ImportError::reconciliation_failure(e)),
            }
        }
    }
}

/// Remove duplicate names, keeping the first occurrence of each
///
/// Comparison is exact: no trimming, no case folding.
pub fn distinct_titles(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Titles from `distinct` that no category in `existing` carries
pub fn titles_to_create(distinct: &[String], existing: &[Category]) -> Vec<String> {
    let existing: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    distinct
        .iter()
        .filter(|title| !existing.contains(title.as_str()))
        .cloned()
        .collect()
}
