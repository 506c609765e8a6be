//! File-system source gateway

use crate::core::traits::SourceGateway;
use crate::types::SourceError;
use async_trait::async_trait;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Reads import files from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

#[async_trait]
impl SourceGateway for FsSource {
    type Reader = Compat<tokio::fs::File>;

    async fn open(&self, path: &str) -> Result<Self::Reader, SourceError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| SourceError::from_io(path, e))?;

        // Wrap tokio file in a compatibility layer for csv-async
        Ok(file.compat())
    }

    async fn delete_after_import(&self, path: &str) -> Result<(), SourceError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| SourceError::from_io(path, e))
    }
}
