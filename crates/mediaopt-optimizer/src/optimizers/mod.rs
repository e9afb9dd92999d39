//! Built-in optimizers

pub mod binary;
#[cfg(feature = "image")]
pub mod mozjpeg;

pub use binary::BinaryOptimizer;
#[cfg(feature = "image")]
pub use self::mozjpeg::MozjpegOptimizer;

use crate::optimizer::Optimizer;
use mediaopt_core::Config;
use std::sync::Arc;

/// The default optimizer chain, in priority order
pub fn default_optimizers(config: &Config) -> Vec<Arc<dyn Optimizer>> {
    let tool = |optimizer: BinaryOptimizer| -> Arc<dyn Optimizer> {
        Arc::new(optimizer.with_search_dirs(config.optimizer_bin_dirs.clone()))
    };

    let mut optimizers = vec![tool(binary::jpegoptim()), tool(binary::jpegtran()), tool(binary::guetzli())];

    #[cfg(feature = "image")]
    optimizers.push(Arc::new(MozjpegOptimizer::new(config.jpeg_quality)));

    optimizers.extend([
        tool(binary::optipng()),
        tool(binary::pngcrush()),
        tool(binary::pngout()),
        tool(binary::cwebp()),
    ]);

    optimizers
}
