//! Artifact storage abstraction
//!
//! This module defines the ArtifactStore trait that the signing workflow writes
//! uploaded documents through.

use async_trait::async_trait;
use bytes::Bytes;
use signflow_core::{AppError, ArtifactReference};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable store for uploaded documents
///
/// Implementations write the payload once under a freshly generated key and
/// return where it can be fetched from. There is no read-back and no retry: one
/// failed write is reported as is.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `data` and return its reference (bucket, key, content type, public URL).
    ///
    /// `extension` is the original file extension without the dot; it is kept on
    /// the generated key.
    async fn store(
        &self,
        data: Bytes,
        content_type: &str,
        extension: Option<&str>,
    ) -> StorageResult<ArtifactReference>;
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}
