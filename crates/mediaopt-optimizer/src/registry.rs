//! Optimizer registry: the MIME-type-to-optimizer selector

use crate::error::{OptimizerError, OptimizerResult};
use crate::mime::detect_mime_type;
use crate::optimizer::Optimizer;
use crate::optimizers;
use crate::service::OptimizerService;
use async_trait::async_trait;
use mediaopt_core::Config;
use std::path::Path;
use std::sync::Arc;

/// Ordered collection of optimizers
///
/// Lookup by MIME type returns the first registered optimizer that supports
/// the type and can run on this host, so registration order is priority order.
#[derive(Clone, Default)]
pub struct OptimizerRegistry {
    optimizers: Vec<Arc<dyn Optimizer>>,
}

impl OptimizerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default optimizer chain
    ///
    /// External tools come first per format. The in-process JPEG encoder sits
    /// behind them as a fallback for hosts without any JPEG tool installed.
    /// Optimizers named in `OPTIMIZER_DISABLED` are left out.
    pub fn with_defaults(config: &Config) -> Self {
        let mut registry = Self::new();

        for optimizer in optimizers::default_optimizers(config) {
            if config.is_optimizer_disabled(optimizer.name()) {
                tracing::debug!(optimizer = %optimizer.name(), "Optimizer disabled by configuration");
                continue;
            }
            registry.register(optimizer);
        }

        registry
    }

    /// Append an optimizer to the chain
    pub fn register(&mut self, optimizer: Arc<dyn Optimizer>) {
        self.optimizers.push(optimizer);
    }

    pub fn len(&self) -> usize {
        self.optimizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.optimizers.is_empty()
    }
}

#[async_trait]
impl OptimizerService for OptimizerRegistry {
    async fn optimize(&self, path: &Path) -> OptimizerResult<()> {
        let mime_type = detect_mime_type(path).await?;
        let optimizer = self.optimizer_by_mime_type(&mime_type)?;
        let start = std::time::Instant::now();

        optimizer.run(path).await?;

        tracing::info!(
            path = %path.display(),
            mime_type = %mime_type,
            optimizer = %optimizer.name(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File optimized"
        );

        Ok(())
    }

    fn optimizer_by_mime_type(&self, mime_type: &str) -> OptimizerResult<Arc<dyn Optimizer>> {
        self.optimizers
            .iter()
            .find(|o| o.supports(mime_type) && o.is_runnable())
            .cloned()
            .ok_or_else(|| OptimizerError::OptimizerNotFound {
                mime_type: mime_type.to_string(),
            })
    }

    fn optimizers(&self) -> Vec<Arc<dyn Optimizer>> {
        self.optimizers.clone()
    }
}
