use crate::keys::validate_key;
use crate::traits::{ByteStream, Filesystem, StorageError, StorageResult};
use crate::AdapterType;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};

/// S3 storage implementation
#[derive(Clone, Debug)]
pub struct S3Filesystem {
    store: AmazonS3,
    bucket: String,
}

impl S3Filesystem {
    /// Create a new S3Filesystem instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        // Credentials come from the environment (AWS_ACCESS_KEY_ID etc.)
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Filesystem { store, bucket })
    }

    fn location(storage_key: &str) -> StorageResult<Path> {
        validate_key(storage_key)?;
        Ok(Path::from(storage_key.to_string()))
    }
}

/// Map an object_store error onto the storage error taxonomy
fn map_object_error(
    storage_key: &str,
    error: ObjectStoreError,
    fallback: fn(String) -> StorageError,
) -> StorageError {
    match error {
        ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
        ObjectStoreError::AlreadyExists { .. } => {
            StorageError::AlreadyExists(storage_key.to_string())
        }
        other => fallback(other.to_string()),
    }
}

#[async_trait]
impl Filesystem for S3Filesystem {
    async fn read_stream(&self, path: &str) -> StorageResult<ByteStream> {
        let start = std::time::Instant::now();
        let location = Self::location(path)?;

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| {
            let err = map_object_error(path, e, StorageError::DownloadFailed);
            tracing::error!(
                error = %err,
                bucket = %self.bucket,
                key = %path,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 read stream failed"
            );
            err
        })?;

        let bucket = self.bucket.clone();
        let key = path.to_string();

        let stream = result.into_stream().map(move |res| match res {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::error!(
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
                Err(StorageError::DownloadFailed(e.to_string()))
            }
        });

        Ok(Box::pin(stream))
    }

    async fn write_stream(&self, path: &str, mut stream: ByteStream) -> StorageResult<u64> {
        let location = Self::location(path)?;
        let start = std::time::Instant::now();

        // Media files are small enough to buffer and upload with a single put.
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        let size = buffer.len() as u64;
        let bytes: Bytes = buffer.freeze();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(bytes)).await;

        result.map_err(|e| {
            let err = map_object_error(path, e, StorageError::UploadFailed);
            tracing::error!(
                error = %err,
                bucket = %self.bucket,
                key = %path,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 stream write failed"
            );
            err
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream write successful"
        );

        Ok(size)
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Self::location(path)?;

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %path,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let location = Self::location(path)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> AdapterType {
        AdapterType::S3
    }
}
