use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use parsifly_core::Platform;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "parsifly-cli")]
#[command(about = "Scrape social profiles and classify their posts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a profile, classify every post and print the performance data
    Run {
        /// `TikTok`, `Instagram` or `YouTube` (case-insensitive)
        #[arg(long)]
        platform: Platform,
        /// Handle, `@handle` or profile URL
        #[arg(long)]
        profile: String,
    },
    /// Scrape and normalize a profile without classifying
    Scrape {
        #[arg(long)]
        platform: Platform,
        #[arg(long)]
        profile: String,
    },
    /// Classify posts read from a JSON file
    Analyze {
        /// File holding `{"posts": [...]}` or a bare array of posts
        #[arg(long)]
        input: PathBuf,
    },
    /// Normalize a saved raw dataset without touching the network
    Adapt {
        #[arg(long)]
        platform: Platform,
        /// File holding a JSON array of raw scraper items
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = parsifly_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { platform, profile } => {
            commands::run_batch(&config, platform, &profile).await
        }
        Commands::Scrape { platform, profile } => {
            commands::scrape(&config, platform, &profile).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Analyze { input } => {
            commands::analyze(&config, &input).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Adapt { platform, input } => {
            commands::adapt(platform, &input)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
