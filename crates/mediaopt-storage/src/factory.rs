#[cfg(feature = "storage-local")]
use crate::LocalFilesystem;
#[cfg(feature = "storage-s3")]
use crate::S3Filesystem;
use crate::{AdapterType, MediaStorage, ScratchFilesystem, StorageError, StorageGateway, StorageResult};
use mediaopt_core::Config;
use std::sync::Arc;

/// Create the storage gateway for the configured backend
pub async fn create_gateway(config: &Config) -> StorageResult<Arc<dyn StorageGateway>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        AdapterType::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let filesystem = S3Filesystem::new(bucket, region, config.s3_endpoint.clone())?;
            Ok(Arc::new(MediaStorage::remote(Arc::new(filesystem))))
        }

        #[cfg(not(feature = "storage-s3"))]
        AdapterType::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        AdapterType::Local => {
            let root = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let filesystem = LocalFilesystem::new(root.clone()).await?;
            Ok(Arc::new(MediaStorage::local(root, Arc::new(filesystem))))
        }

        #[cfg(not(feature = "storage-local"))]
        AdapterType::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        AdapterType::Other(tag) => Err(StorageError::ConfigError(format!(
            "Storage backend '{}' is not supported",
            tag
        ))),
    }
}

/// Create the local scratch area used for remote round trips
#[cfg(feature = "storage-local")]
pub async fn create_scratch(config: &Config) -> StorageResult<Arc<dyn ScratchFilesystem>> {
    let scratch = LocalFilesystem::new(config.scratch_dir().clone()).await?;
    Ok(Arc::new(scratch))
}

#[cfg(not(feature = "storage-local"))]
pub async fn create_scratch(_config: &Config) -> StorageResult<Arc<dyn ScratchFilesystem>> {
    Err(StorageError::ConfigError(
        "Scratch storage requires the storage-local feature".to_string(),
    ))
}
