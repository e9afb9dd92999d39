use mediaopt_optimizer::{OptimizerInfo, OptimizerService};
use std::path::{Path, PathBuf};

/// Load environment variables from `path`, or from `.env` when `None`.
///
/// Variables already set in the process environment are kept. Returns the
/// file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render optimizers as a fixed-width table
pub fn render_optimizer_table(optimizers: &[OptimizerInfo]) -> String {
    let mut out = format!("{:<12} {:<9} {}\n", "NAME", "RUNNABLE", "MIME TYPES");
    for info in optimizers {
        out.push_str(&format!(
            "{:<12} {:<9} {}\n",
            truncate_string(&info.name, 12),
            if info.runnable { "yes" } else { "no" },
            info.supported_mime_types.join(", ")
        ));
    }
    out
}

/// Optimize each path in turn, continuing past failures
///
/// Returns the paths that failed, with their error messages.
pub async fn optimize_paths(
    service: &dyn OptimizerService,
    paths: &[PathBuf],
) -> Vec<(PathBuf, String)> {
    let mut failures = Vec::new();

    for path in paths {
        match service.optimize(path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Optimized"),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Optimization failed");
                failures.push((path.clone(), e.to_string()));
            }
        }
    }

    failures
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
