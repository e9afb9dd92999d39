use crate::error::{OptimizerError, OptimizerResult};
use crate::optimizer::Optimizer;
use async_trait::async_trait;
use mediaopt_core::constants::DEFAULT_JPEG_QUALITY;
use std::path::Path;

/// In-process JPEG re-encoder using mozjpeg
///
/// Always runnable. The re-encoded image only replaces the original when it
/// is smaller.
#[derive(Debug)]
pub struct MozjpegOptimizer {
    quality: u8,
    mime_types: Vec<String>,
}

impl MozjpegOptimizer {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            mime_types: vec!["image/jpeg".to_string()],
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    fn compress(data: &[u8], quality: u8) -> OptimizerResult<Vec<u8>> {
        let img = image::load_from_memory(data)
            .map_err(|e| OptimizerError::ImageProcessing(e.to_string()))?;
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = ::mozjpeg::Compress::new(::mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }
}

impl Default for MozjpegOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

#[async_trait]
impl Optimizer for MozjpegOptimizer {
    fn name(&self) -> &str {
        "mozjpeg"
    }

    fn supported_mime_types(&self) -> &[String] {
        &self.mime_types
    }

    fn is_runnable(&self) -> bool {
        true
    }

    async fn run(&self, path: &Path) -> OptimizerResult<()> {
        let original = tokio::fs::read(path).await?;
        let original_size = original.len();
        let quality = self.quality;

        // Encoding is CPU-bound
        let optimized = tokio::task::spawn_blocking(move || Self::compress(&original, quality))
            .await
            .map_err(|e| OptimizerError::ImageProcessing(format!("encoder task failed: {}", e)))??;

        if optimized.is_empty() || optimized.len() >= original_size {
            tracing::debug!(
                path = %path.display(),
                original_size,
                optimized_size = optimized.len(),
                "Re-encoded JPEG not smaller, keeping original"
            );
            return Ok(());
        }

        tokio::fs::write(path, &optimized).await?;
        Ok(())
    }
}
