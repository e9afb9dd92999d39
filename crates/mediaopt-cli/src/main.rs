//! mediaopt: optimize media files in the configured storage.
//!
//! Storage and optimizer settings come from the environment (or `.env`):
//! STORAGE_BACKEND, LOCAL_STORAGE_PATH, S3_BUCKET, S3_REGION, SCRATCH_DIR, ...

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mediaopt_cli::{init_tracing, load_env_file, optimize_paths, render_optimizer_table};
use mediaopt_core::Config;
use mediaopt_optimizer::{
    OptimizerInfo, OptimizerRegistry, OptimizerService, RemoteOptimizationCoordinator,
};
use mediaopt_storage::{create_gateway, create_scratch};

#[derive(Parser)]
#[command(name = "mediaopt", about = "Optimize media files in local or remote storage")]
struct Cli {
    /// Environment file to load instead of `./.env`
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize one or more resources in the configured storage
    Optimize {
        /// Resource paths, relative to the storage root
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List the registered optimizers
    Info {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG may come from the env file
    let env_file = load_env_file(cli.env_file.as_deref());
    init_tracing();
    if let Some(path) = &env_file {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    let registry = Arc::new(OptimizerRegistry::with_defaults(&config));

    match cli.command {
        Commands::Optimize { paths } => {
            config.validate().context("Invalid configuration")?;

            let gateway = create_gateway(&config)
                .await
                .context("Failed to initialize storage")?;
            let scratch = create_scratch(&config)
                .await
                .context("Failed to initialize scratch directory")?;

            tracing::info!(
                backend = %gateway.adapter_type(),
                optimizers = registry.len(),
                "Storage initialized"
            );

            let coordinator = RemoteOptimizationCoordinator::new(registry, gateway, scratch);
            let failures = optimize_paths(&coordinator, &paths).await;

            if !failures.is_empty() {
                for (path, error) in &failures {
                    eprintln!("{}: {}", path.display(), error);
                }
                anyhow::bail!("{} of {} files failed to optimize", failures.len(), paths.len());
            }
        }
        Commands::Info { format } => {
            let infos: Vec<OptimizerInfo> = registry
                .optimizers()
                .iter()
                .map(|o| OptimizerInfo::of(o.as_ref()))
                .collect();

            match format {
                OutputFormat::Json => {
                    let out = serde_json::to_string_pretty(&infos).context("Serialize optimizers")?;
                    println!("{}", out);
                }
                OutputFormat::Table => print!("{}", render_optimizer_table(&infos)),
            }
        }
    }

    Ok(())
}
