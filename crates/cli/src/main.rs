//! Dockboard CLI
//!
//! A command-line front end for the dashboard: list images and containers,
//! start and stop containers, check the engine version and view the memory
//! usage forecast.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{engine, predict};
use output::OutputFormat;

/// Dockboard CLI
#[derive(Parser)]
#[command(name = "dockctl")]
#[command(author, version, about = "CLI for the Dockboard container dashboard", long_about = None)]
pub struct Cli {
    /// Dashboard URL (can also be set via DOCKBOARD_API_URL env var)
    #[arg(long, env = "DOCKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Output format [default: table]
    #[arg(long, short)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List images known to the engine
    Images,

    /// List all containers, running or stopped
    Containers,

    /// Start a container
    Start {
        /// Container ID or name
        id: String,
    },

    /// Stop a container
    Stop {
        /// Container ID or name
        id: String,
    },

    /// Compare the installed Docker version with the latest release
    Version,

    /// Show memory usage per container and the forecast
    Predict {
        /// Collect fresh stats instead of reusing the last dataset
        #[arg(long)]
        refresh: bool,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?;

    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
        })
        .unwrap_or_default();

    let client = client::ApiClient::new(&config.resolve_api_url(cli.api_url))?;

    match cli.command {
        Commands::Images => engine::list_images(&client, format).await?,
        Commands::Containers => engine::list_containers(&client, format).await?,
        Commands::Start { id } => engine::container_action(&client, "start", &id, format).await?,
        Commands::Stop { id } => engine::container_action(&client, "stop", &id, format).await?,
        Commands::Version => engine::show_version(&client, format).await?,
        Commands::Predict { refresh } => predict::show_prediction(&client, refresh, format).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
