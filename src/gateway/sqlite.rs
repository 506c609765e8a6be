//! SQLite storage gateway
//!
//! A single `rusqlite` connection behind a mutex. Every call runs on the
//! blocking thread pool so the async import never stalls on disk I/O.
//!
//! Category titles carry a `UNIQUE` constraint, which is what keeps two
//! imports racing on the same new title from both creating it: the loser's
//! batch is rolled back and reported as [`StorageError::DuplicateCategory`].
//! Writers take the database lock when their SQL transaction begins, and
//! wait up to [`BUSY_TIMEOUT`] for a lock held by another connection.

use crate::core::traits::StorageGateway;
use crate::types::{
    Category, StorageError, Transaction, TransactionDraft, TransactionKind,
};
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, TransactionBehavior};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// How long a statement waits for another connection's lock
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Titles per lookup query, well below SQLite's bind parameter limit
const LOOKUP_CHUNK_SIZE: usize = 500;

pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
    value TEXT NOT NULL,
    category_id TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);
";

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        StorageError::backend(error.to_string())
    }
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_id(raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw).map_err(|e| StorageError::backend(format!("invalid id '{raw}': {e}")))
}

/// Storage gateway backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StorageError::backend("connection lock poisoned"))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StorageError::backend(format!("storage task failed: {e}")))?
    }

    /// Every stored category, ordered by title
    pub async fn all_categories(&self) -> Result<Vec<Category>, StorageError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, title FROM categories ORDER BY title")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let categories = rows
                .map(|row| -> Result<Category, StorageError> {
                    let (id, title) = row?;
                    Ok(Category {
                        id: parse_id(&id)?,
                        title,
                    })
                })
                .collect::<Result<Vec<_>, StorageError>>()?;
            Ok(categories)
        })
        .await
    }

    /// Every stored transaction with its category, in insertion order
    pub async fn all_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.title, t.type, t.value, c.id, c.title
                 FROM transactions t JOIN categories c ON c.id = t.category_id
                 ORDER BY t.rowid",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?;
            let transactions = rows.map(|row| -> Result<Transaction, StorageError> {
                let (id, title, kind, value, category_id, category_title) = row?;
                let kind = TransactionKind::parse(&kind)
                    .ok_or_else(|| StorageError::backend(format!("invalid type '{kind}'")))?;
                let amount = Decimal::from_str(&value)
                    .map_err(|e| StorageError::backend(format!("invalid value '{value}': {e}")))?;
                Ok(Transaction {
                    id: parse_id(&id)?,
                    title,
                    kind,
                    amount,
                    category: Category {
                        id: parse_id(&category_id)?,
                        title: category_title,
                    },
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
            Ok(transactions)
        })
        .await
    }
}

#[async_trait]
impl StorageGateway for SqliteStorage {
    async fn find_categories_by_titles(
        &self,
        titles: &HashSet<String>,
    ) -> Result<Vec<Category>, StorageError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let titles: Vec<String> = titles.iter().cloned().collect();
        self.with_connection(move |conn| {
            let mut categories = Vec::new();
            for chunk in titles.chunks(LOOKUP_CHUNK_SIZE) {
                let placeholders = vec!["?"; chunk.len()].join(", ");
                let sql =
                    format!("SELECT id, title FROM categories WHERE title IN ({placeholders})");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;
                for row in rows {
                    let (id, title) = row?;
                    categories.push(Category {
                        id: parse_id(&id)?,
                        title,
                    });
                }
            }
            Ok(categories)
        })
        .await
    }

    async fn create_categories(&self, titles: &[String]) -> Result<Vec<Category>, StorageError> {
        let titles = titles.to_vec();
        self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut created = Vec::with_capacity(titles.len());
            {
                let mut stmt = tx.prepare("INSERT INTO categories (id, title) VALUES (?1, ?2)")?;
                for title in titles {
                    let category = Category::new(title);
                    let inserted = stmt.execute(params![category.id.to_string(), category.title]);
                    match inserted {
                        Ok(_) => created.push(category),
                        Err(e) if is_unique_violation(&e) => {
                            return Err(StorageError::DuplicateCategory {
                                title: category.title,
                            })
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            tx.commit()?;
            Ok(created)
        })
        .await
    }

    async fn create_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, StorageError> {
        self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut created = Vec::with_capacity(drafts.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO transactions (id, title, type, value, category_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for draft in drafts {
                    let transaction = Transaction::from_draft(draft);
                    stmt.execute(params![
                        transaction.id.to_string(),
                        transaction.title,
                        transaction.kind.as_str(),
                        transaction.amount.to_string(),
                        transaction.category.id.to_string(),
                    ])?;
                    created.push(transaction);
                }
            }
            tx.commit()?;
            Ok(created)
        })
        .await
    }
}
