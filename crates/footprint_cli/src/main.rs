//! Footprint CLI
//!
//! Inspect saved analysis snapshots and replay their loading journey.
//!
//! ```text
//! footprint summary analysis.json
//! footprint replay analysis.json --speed 2
//! footprint init
//! ```

mod config;
mod replay;
mod summary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use footprint_core::AnalysisDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{FootprintConfig, CONFIG_FILE};

/// Web footprint analysis viewer
#[derive(Parser, Debug)]
#[command(name = "footprint")]
#[command(about = "Inspect web footprint analyses and replay their loading journey")]
#[command(version)]
struct Cli {
    /// Config file or directory containing footprint.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the loading journey of a saved snapshot
    Replay {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Playback speed (must be one of the configured speeds)
        #[arg(short, long)]
        speed: Option<f64>,

        /// Start from this event index
        #[arg(long)]
        from: Option<usize>,

        /// Restart when the end is reached
        #[arg(long = "loop")]
        loop_playback: bool,
    },

    /// Print servers, providers and resolver latency for a snapshot
    Summary {
        /// Snapshot JSON file
        snapshot: PathBuf,
    },

    /// Write a default footprint.toml
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => init(&path),
        Commands::Summary { snapshot } => {
            let config = FootprintConfig::load(cli.config.as_deref())?;
            let document = load_snapshot(&snapshot)?;
            summary::print(&document, &config)
        }
        Commands::Replay {
            snapshot,
            speed,
            from,
            loop_playback,
        } => {
            let mut config = FootprintConfig::load(cli.config.as_deref())?;
            if let Some(speed) = speed {
                config.playback.initial_speed = config.playback.check_speed(speed)?;
            }
            config.playback.loop_playback |= loop_playback;

            let document = load_snapshot(&snapshot)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?;
            runtime.block_on(replay::run(document, &config, from))
        }
    }
}

fn load_snapshot(path: &Path) -> Result<AnalysisDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    AnalysisDocument::from_json(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

fn init(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let target = path.join(CONFIG_FILE);
    if target.exists() {
        anyhow::bail!("{} already exists", target.display());
    }

    fs::write(&target, FootprintConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!("Created {}", target.display());
    Ok(())
}
