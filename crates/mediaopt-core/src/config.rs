//! Configuration module
//!
//! Storage, scratch and optimizer settings, read from the process
//! environment.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_SCRATCH_DIR_NAME};
use crate::storage_types::AdapterType;

/// Optimizer service configuration
#[derive(Clone, Debug)]
pub struct Config {
    // Storage configuration
    pub storage_backend: AdapterType,
    pub local_storage_path: Option<PathBuf>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    // Scratch area for remote round trips
    pub scratch_dir: PathBuf,
    // Optimizer configuration
    pub optimizer_bin_dirs: Vec<PathBuf>,
    pub optimizer_disabled: Vec<String>,
    pub jpeg_quality: u8,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Binaries load `.env` before calling this.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(tag) => tag.parse::<AdapterType>()?,
            None => AdapterType::Local,
        };

        let scratch_dir = var("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_SCRATCH_DIR_NAME));

        let optimizer_bin_dirs = var("OPTIMIZER_BIN_DIRS")
            .map(|dirs| {
                dirs.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        let optimizer_disabled = var("OPTIMIZER_DISABLED")
            .map(|names| {
                names
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let jpeg_quality = match var("JPEG_QUALITY") {
            Some(q) => q
                .trim()
                .parse::<u8>()
                .map_err(|_| anyhow::anyhow!("JPEG_QUALITY must be a number between 1 and 100"))?,
            None => DEFAULT_JPEG_QUALITY,
        };

        Ok(Config {
            storage_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH").map(PathBuf::from),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            scratch_dir,
            optimizer_bin_dirs,
            optimizer_disabled,
            jpeg_quality,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!(
                "JPEG_QUALITY must be between 1 and 100, got {}",
                self.jpeg_quality
            ));
        }

        match &self.storage_backend {
            AdapterType::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            AdapterType::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            AdapterType::Other(tag) => {
                return Err(anyhow::anyhow!("Unsupported storage backend: {}", tag));
            }
        }

        Ok(())
    }

    pub fn storage_backend(&self) -> &AdapterType {
        &self.storage_backend
    }

    pub fn scratch_dir(&self) -> &PathBuf {
        &self.scratch_dir
    }

    /// S3 region, falling back to `AWS_REGION`
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region
            .as_deref()
            .or(self.aws_region.as_deref())
    }

    pub fn is_optimizer_disabled(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.optimizer_disabled.iter().any(|n| *n == name)
    }
}
