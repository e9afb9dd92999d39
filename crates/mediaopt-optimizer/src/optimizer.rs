use crate::error::OptimizerResult;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;

/// A MIME-type-specific transform that shrinks a media file in place
#[async_trait]
pub trait Optimizer: Send + Sync + Debug {
    /// Optimizer name/identifier
    fn name(&self) -> &str;

    /// MIME types this optimizer accepts (e.g., `["image/jpeg"]`)
    fn supported_mime_types(&self) -> &[String];

    /// Whether the optimizer can run on this host
    fn is_runnable(&self) -> bool;

    /// Optimize the file at `path`, replacing its content
    async fn run(&self, path: &Path) -> OptimizerResult<()>;

    fn supports(&self, mime_type: &str) -> bool {
        self.supported_mime_types()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type))
    }
}

/// Optimizer information for listing available optimizers
#[derive(Debug, Clone, Serialize)]
pub struct OptimizerInfo {
    pub name: String,
    pub runnable: bool,
    pub supported_mime_types: Vec<String>,
}

impl OptimizerInfo {
    pub fn of(optimizer: &dyn Optimizer) -> Self {
        OptimizerInfo {
            name: optimizer.name().to_string(),
            runnable: optimizer.is_runnable(),
            supported_mime_types: optimizer.supported_mime_types().to_vec(),
        }
    }
}
