//! Filesystem abstraction traits
//!
//! This module defines the traits every storage backend implements, and the
//! extra capability the scratch area needs so optimizers can run on its files.

use crate::AdapterType;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stream of file content chunks
///
/// Returned by [`Filesystem::read_stream`] and accepted by
/// [`Filesystem::write_stream`], so a read from one filesystem can be piped
/// straight into a write on another.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Filesystem abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait. Paths
/// are backend-relative keys, see the crate root documentation.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Open a read stream on the file at `path`
    ///
    /// Fails with [`StorageError::NotFound`] if the file does not exist.
    async fn read_stream(&self, path: &str) -> StorageResult<ByteStream>;

    /// Write a stream to `path`, consuming it until the end
    ///
    /// Returns the number of bytes written. Backends that refuse to replace
    /// an existing file report [`StorageError::AlreadyExists`].
    async fn write_stream(&self, path: &str, stream: ByteStream) -> StorageResult<u64>;

    /// Delete the file at `path`
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> AdapterType;
}

/// A filesystem whose files live on local disk
///
/// Used for the scratch area: optimizers are external tools or decoders that
/// work on real files, so they need the on-disk path behind a key.
pub trait ScratchFilesystem: Filesystem {
    /// Resolve a key to its path on local disk
    fn path_of(&self, path: &str) -> StorageResult<PathBuf>;
}
