//! Gateway adapters
//!
//! Concrete implementations of the storage and source traits:
//! - `fs` - Import files on the local file system
//! - `memory` - In-process storage and source
//! - `sqlite` - SQLite-backed storage

pub mod fs;
pub mod memory;
pub mod sqlite;

pub use fs::FsSource;
pub use memory::{MemorySource, MemoryStorage};
pub use sqlite::SqliteStorage;
