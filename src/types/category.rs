//! Category types for the ledger importer
//!
//! Categories are owned by storage. The import pipeline only looks them up
//! by title and creates the ones that are missing; it never updates or
//! deletes them.

use uuid::Uuid;

/// Category identifier
pub type CategoryId = Uuid;

/// A persisted category
///
/// Titles are unique by convention and compared exactly (case-sensitive,
/// no normalization). An empty title is a valid category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// Storage-assigned identity
    pub id: CategoryId,

    /// Category title as it appeared in the imported file (trimmed)
    pub title: String,
}

impl Category {
    /// Create a category with a fresh identity
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }
}
