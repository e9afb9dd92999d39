//! mediaopt optimizer library
//!
//! Optimizers are chosen by MIME type from an [`OptimizerRegistry`]. The
//! [`RemoteOptimizationCoordinator`] puts the registry in front of the
//! configured storage: files on local storage are optimized in place, files
//! on remote storage are staged through a local scratch area and written back.

pub mod coordinator;
pub mod error;
pub mod mime;
pub mod optimizer;
pub mod optimizers;
pub mod registry;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use coordinator::RemoteOptimizationCoordinator;
pub use error::{OptimizerError, OptimizerResult};
pub use optimizer::{Optimizer, OptimizerInfo};
pub use registry::OptimizerRegistry;
pub use service::OptimizerService;
