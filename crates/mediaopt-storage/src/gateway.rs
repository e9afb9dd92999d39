//! Storage gateway
//!
//! The gateway tells callers which kind of backing store is active and hands
//! out the filesystem behind it.

use crate::keys::validate_key;
use crate::traits::{Filesystem, StorageError, StorageResult};
use crate::AdapterType;
use std::path::PathBuf;
use std::sync::Arc;

/// Access point to the active backing store
pub trait StorageGateway: Send + Sync {
    /// The adapter tag of the backing store (`local`, `s3`, ...)
    fn adapter_type(&self) -> AdapterType;

    /// The backing store's filesystem
    ///
    /// Remote-mode callers use this handle to move files in and out of the store.
    fn filesystem(&self) -> Arc<dyn Filesystem>;

    /// Resolve a resource to its file on local disk
    ///
    /// Only meaningful for the `local` adapter; remote adapters return a
    /// `ConfigError`.
    fn local_path(&self, resource: &str) -> StorageResult<PathBuf>;
}

/// Gateway over a configured backing store
#[derive(Clone)]
pub struct MediaStorage {
    adapter_type: AdapterType,
    filesystem: Arc<dyn Filesystem>,
    local_root: Option<PathBuf>,
}

impl MediaStorage {
    /// Gateway over a local media directory
    pub fn local(root: impl Into<PathBuf>, filesystem: Arc<dyn Filesystem>) -> Self {
        MediaStorage {
            adapter_type: AdapterType::Local,
            filesystem,
            local_root: Some(root.into()),
        }
    }

    /// Gateway over a remote store
    pub fn remote(filesystem: Arc<dyn Filesystem>) -> Self {
        MediaStorage {
            adapter_type: filesystem.backend_type(),
            filesystem,
            local_root: None,
        }
    }
}

impl StorageGateway for MediaStorage {
    fn adapter_type(&self) -> AdapterType {
        self.adapter_type.clone()
    }

    fn filesystem(&self) -> Arc<dyn Filesystem> {
        Arc::clone(&self.filesystem)
    }

    fn local_path(&self, resource: &str) -> StorageResult<PathBuf> {
        let root = self.local_root.as_ref().ok_or_else(|| {
            StorageError::ConfigError(format!(
                "{} storage has no local path for {}",
                self.adapter_type, resource
            ))
        })?;

        validate_key(resource)?;
        Ok(root.join(resource))
    }
}
