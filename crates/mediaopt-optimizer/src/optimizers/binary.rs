//! Optimizers backed by external command-line tools

use crate::error::{OptimizerError, OptimizerResult};
use crate::optimizer::Optimizer;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;

/// Placeholder for the file being optimized
const FILE_PLACEHOLDER: &str = "{file}";
/// Placeholder for a separate output file
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// An optimizer that shells out to an external tool
///
/// Arguments may reference `{file}` (the input path) and `{output}`. Tools that
/// rewrite the input in place only use `{file}`. For tools that need a separate
/// output, the result is written to a temp file next to the input and only
/// replaces it when it is non-empty and smaller.
#[derive(Debug)]
pub struct BinaryOptimizer {
    name: String,
    command: String,
    args: Vec<String>,
    mime_types: Vec<String>,
    search_dirs: Vec<PathBuf>,
    resolved: OnceLock<Option<PathBuf>>,
}

impl BinaryOptimizer {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        args: &[&str],
        mime_types: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            mime_types: mime_types.iter().map(|m| m.to_string()).collect(),
            search_dirs: Vec::new(),
            resolved: OnceLock::new(),
        }
    }

    /// Extra directories searched before `PATH`
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    /// Full path of the tool, if it can be found
    pub fn executable(&self) -> Option<&Path> {
        self.resolved
            .get_or_init(|| self.find_executable())
            .as_deref()
    }

    fn find_executable(&self) -> Option<PathBuf> {
        let command = Path::new(&self.command);
        if command.components().count() > 1 {
            return is_executable(command).then(|| command.to_path_buf());
        }

        let path_dirs = std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
            .unwrap_or_default();

        self.search_dirs
            .iter()
            .chain(path_dirs.iter())
            .map(|dir| dir.join(&self.command))
            .find(|candidate| is_executable(candidate))
    }

    fn writes_separate_output(&self) -> bool {
        self.args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER))
    }

    fn build_args(&self, input: &Path, output: Option<&Path>) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.map(|o| o.to_string_lossy());

        self.args
            .iter()
            .map(|arg| {
                let arg = arg.replace(FILE_PLACEHOLDER, &input);
                match &output {
                    Some(out) => arg.replace(OUTPUT_PLACEHOLDER, out),
                    None => arg,
                }
            })
            .collect()
    }

    async fn execute(&self, executable: &Path, args: &[String]) -> OptimizerResult<()> {
        tracing::debug!(optimizer = %self.name, args = ?args, "Running optimizer");

        let output = Command::new(executable).args(args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                optimizer = %self.name,
                status = %output.status,
                stderr = %stderr,
                "Optimizer command failed"
            );
            return Err(OptimizerError::CommandFailed {
                name: self.name.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Optimizer for BinaryOptimizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_mime_types(&self) -> &[String] {
        &self.mime_types
    }

    fn is_runnable(&self) -> bool {
        self.executable().is_some()
    }

    async fn run(&self, path: &Path) -> OptimizerResult<()> {
        let executable = self
            .executable()
            .ok_or_else(|| OptimizerError::NotRunnable {
                name: self.name.clone(),
                reason: format!("command '{}' not found", self.command),
            })?
            .to_path_buf();

        if !self.writes_separate_output() {
            let args = self.build_args(path, None);
            return self.execute(&executable, &args).await;
        }

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        // Removed on drop unless it is persisted over the input
        let output = tempfile::Builder::new()
            .prefix(".mediaopt-")
            .suffix(&suffix)
            .tempfile_in(parent)?;

        let args = self.build_args(path, Some(output.path()));
        self.execute(&executable, &args).await?;

        let original_size = tokio::fs::metadata(path).await?.len();
        let optimized_size = tokio::fs::metadata(output.path()).await?.len();

        if optimized_size == 0 || optimized_size >= original_size {
            tracing::debug!(
                optimizer = %self.name,
                original_size,
                optimized_size,
                "Optimizer output not smaller, keeping original"
            );
            return Ok(());
        }

        output.persist(path).map_err(|e| OptimizerError::Io(e.error))?;

        Ok(())
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// jpegoptim: lossless JPEG optimization in place
pub fn jpegoptim() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "jpegoptim",
        "jpegoptim",
        &["--strip-all", "--all-progressive", "--quiet", FILE_PLACEHOLDER],
        &["image/jpeg"],
    )
}

/// jpegtran: lossless JPEG recompression
pub fn jpegtran() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "jpegtran",
        "jpegtran",
        &[
            "-copy",
            "none",
            "-optimize",
            "-progressive",
            "-outfile",
            OUTPUT_PLACEHOLDER,
            FILE_PLACEHOLDER,
        ],
        &["image/jpeg"],
    )
}

/// guetzli: perceptual JPEG encoder (slow)
pub fn guetzli() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "guetzli",
        "guetzli",
        &["--quality", "85", FILE_PLACEHOLDER, OUTPUT_PLACEHOLDER],
        &["image/jpeg"],
    )
}

/// optipng: lossless PNG optimization in place
pub fn optipng() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "optipng",
        "optipng",
        &["-o2", "-strip", "all", "-quiet", FILE_PLACEHOLDER],
        &["image/png"],
    )
}

/// pngcrush: lossless PNG optimization, overwriting the input
pub fn pngcrush() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "pngcrush",
        "pngcrush",
        &["-rem", "alla", "-reduce", "-ow", FILE_PLACEHOLDER],
        &["image/png"],
    )
}

/// pngout: PNG recompression in place
pub fn pngout() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "pngout",
        "pngout",
        &["-q", "-y", FILE_PLACEHOLDER],
        &["image/png"],
    )
}

/// cwebp: WebP re-encoding
pub fn cwebp() -> BinaryOptimizer {
    BinaryOptimizer::new(
        "cwebp",
        "cwebp",
        &["-quiet", "-q", "80", "-m", "6", FILE_PLACEHOLDER, "-o", OUTPUT_PLACEHOLDER],
        &["image/webp"],
    )
}
