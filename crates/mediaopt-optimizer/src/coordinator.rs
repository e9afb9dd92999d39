//! Storage-aware optimization
//!
//! Files on local storage are handed to the optimizer chain where they are.
//! Files on a remote store are copied into the scratch area, optimized there
//! and written back. The scratch copy is deleted on every path once it has
//! been attempted, including when the write-back fails.

use crate::error::{OptimizerError, OptimizerResult};
use crate::optimizer::Optimizer;
use crate::service::OptimizerService;
use async_trait::async_trait;
use mediaopt_storage::{AdapterType, ByteStream, Filesystem, ScratchFilesystem, StorageGateway};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Runs the optimizer chain against resources in the configured storage
pub struct RemoteOptimizationCoordinator {
    optimizer_service: Arc<dyn OptimizerService>,
    gateway: Arc<dyn StorageGateway>,
    scratch: Arc<dyn ScratchFilesystem>,
}

impl RemoteOptimizationCoordinator {
    pub fn new(
        optimizer_service: Arc<dyn OptimizerService>,
        gateway: Arc<dyn StorageGateway>,
        scratch: Arc<dyn ScratchFilesystem>,
    ) -> Self {
        Self {
            optimizer_service,
            gateway,
            scratch,
        }
    }

    async fn optimize_remote(&self, resource: &str, backend: &AdapterType) -> OptimizerResult<()> {
        let remote = self.gateway.filesystem();
        let source = remote.read_stream(resource).await?;

        let scratch_key = scratch_key_for(resource);
        let start = Instant::now();

        let result = self
            .round_trip(remote.as_ref(), resource, &scratch_key, source)
            .await;

        // Cleanup runs whatever the round trip returned
        let cleanup = self.scratch.delete(&scratch_key).await;

        match (result, cleanup) {
            (Ok(size), Ok(())) => {
                tracing::info!(
                    resource = %resource,
                    backend = %backend,
                    size = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Remote file optimized"
                );
                Ok(())
            }
            (Ok(_), Err(cleanup_error)) => {
                tracing::error!(
                    resource = %resource,
                    scratch_key = %scratch_key,
                    error = %cleanup_error,
                    "Failed to delete scratch copy"
                );
                Err(cleanup_error.into())
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_error)) => {
                tracing::warn!(
                    resource = %resource,
                    scratch_key = %scratch_key,
                    error = %cleanup_error,
                    "Failed to delete scratch copy after failed optimization"
                );
                Err(e)
            }
        }
    }

    /// Scratch write, optimize, write back. Returns the bytes written back.
    async fn round_trip(
        &self,
        remote: &dyn Filesystem,
        resource: &str,
        scratch_key: &str,
        source: ByteStream,
    ) -> OptimizerResult<u64> {
        self.scratch.write_stream(scratch_key, source).await?;

        let scratch_path = self.scratch.path_of(scratch_key)?;
        self.optimizer_service.optimize(&scratch_path).await?;

        let optimized = self.scratch.read_stream(scratch_key).await?;
        let size = remote.write_stream(resource, optimized).await?;

        Ok(size)
    }
}

#[async_trait]
impl OptimizerService for RemoteOptimizationCoordinator {
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    async fn optimize(&self, path: &Path) -> OptimizerResult<()> {
        let resource = path
            .to_str()
            .ok_or_else(|| OptimizerError::InvalidPath(path.display().to_string()))?;

        let adapter_type = self.gateway.adapter_type();
        if adapter_type.is_local() {
            let local_path = self.gateway.local_path(resource)?;
            return self.optimizer_service.optimize(&local_path).await;
        }

        self.optimize_remote(resource, &adapter_type).await
    }

    fn optimizer_by_mime_type(&self, mime_type: &str) -> OptimizerResult<Arc<dyn Optimizer>> {
        self.optimizer_service.optimizer_by_mime_type(mime_type)
    }

    fn optimizers(&self) -> Vec<Arc<dyn Optimizer>> {
        self.optimizer_service.optimizers()
    }
}

/// Fresh scratch key that keeps the resource's extension
fn scratch_key_for(resource: &str) -> String {
    let extension = Path::new(resource)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}{}", Uuid::new_v4(), extension)
}
