use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iscroll_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "iscroll")]
#[command(author, version, about = "Touch-style scrolling viewport for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/iscroll/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a text file in a scrollable viewport
    View {
        /// File to display
        file: PathBuf,
        /// Center this 1-based line on open
        #[arg(short = 'l', long)]
        line: Option<usize>,
    },
    /// Fling the in-memory host and print every frame as JSON
    Simulate(commands::simulate::SimulateArgs),
    /// Show the configuration path, or write the defaults there
    Config {
        /// Write a default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The viewer owns the terminal, so it only logs to a file
    let interactive = matches!(cli.command, Commands::View { .. });
    init_logging(cli.log_file.as_deref(), interactive)?;

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    match cli.command {
        Commands::View { file, line } => commands::view::run(&config, &file, line),
        Commands::Simulate(args) => commands::simulate::run(&config, &args),
        Commands::Config { init } => commands::config::run(&config, &config_path, init),
    }
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };
    let stderr_layer = (file_layer.is_none() && !interactive).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}
