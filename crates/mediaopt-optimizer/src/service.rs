use crate::error::OptimizerResult;
use crate::optimizer::Optimizer;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Entry point for optimizing media files
///
/// Implemented by the [`OptimizerRegistry`](crate::OptimizerRegistry), which
/// works on files on local disk, and by the
/// [`RemoteOptimizationCoordinator`](crate::RemoteOptimizationCoordinator),
/// which works on resources in the configured storage. Callers can hold
/// either behind `Arc<dyn OptimizerService>`.
#[async_trait]
pub trait OptimizerService: Send + Sync {
    /// Optimize the file at `path` in place
    async fn optimize(&self, path: &Path) -> OptimizerResult<()>;

    /// The optimizer responsible for `mime_type`
    fn optimizer_by_mime_type(&self, mime_type: &str) -> OptimizerResult<Arc<dyn Optimizer>>;

    /// All registered optimizers, in registration order
    fn optimizers(&self) -> Vec<Arc<dyn Optimizer>>;
}
