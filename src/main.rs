pub mod types;
pub mod config;
pub mod data;
pub mod processing;
pub mod render;
pub mod callbacks;
pub mod layout;
pub mod server;
pub mod export;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard
    Serve {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Write the map and every panel figure as Plotly JSON
    Export {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load(config.as_deref())?;

            // The process does not start without a readable dataset
            let dataset = data::load_dataset(&app_config.input.data_csv)?;

            server::start_server(app_config, dataset).await?;
        }
        Commands::Export { config } => {
            let app_config = config::AppConfig::load(config.as_deref())?;
            let dataset = data::load_dataset(&app_config.input.data_csv)?;

            let out_dir = app_config.export.out_dir.clone();
            tokio::task::spawn_blocking(move || export::export_figures(&out_dir, &dataset))
                .await??;

            info!("Export complete!");
        }
    }

    Ok(())
}
