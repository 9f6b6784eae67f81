use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mentor::api::{ApiClient, CourseBackend};
use mentor::config::API_URL_ENV;
use mentor::{App, Config};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mentor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Course backend URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where to write the log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Config,
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_env("MENTOR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| "mentor=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    let env_url = std::env::var(API_URL_ENV).ok();
    let api_url = config.resolve_api_url(cli.api_url.as_deref(), env_url.as_deref());

    match cli.command {
        Some(Commands::Config) => {
            config.api_base_url = Some(api_url);
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!("config file: {}", Config::config_path()?.display());
        }
        None => {
            let log_path = match cli.log_file {
                Some(path) => path,
                None => Config::log_path()?,
            };
            init_logging(&log_path)?;
            info!(api_url = %api_url, "Starting mentor");

            let shutdown = CancellationToken::new();
            let client = ApiClient::new(api_url, config.connect_timeout())?
                .with_shutdown(shutdown.clone());
            let backend: Arc<dyn CourseBackend> = Arc::new(client);

            let mut app = App::new(config, backend, shutdown)?;
            app.run().await?;
        }
    }

    Ok(())
}
