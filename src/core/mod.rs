//! Core import logic
//!
//! This module contains the import pipeline components:
//! - `traits` - Storage and source gateway abstractions
//! - `reconciler` - Existing-vs-new category detection and batch creation
//! - `coordinator` - End-to-end import orchestration

pub mod coordinator;
pub mod reconciler;
pub mod traits;

pub use coordinator::ImportCoordinator;
pub use reconciler::CategoryReconciler;
pub use traits::{SourceGateway, StorageGateway};
