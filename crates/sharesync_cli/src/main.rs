//! ShareSync CLI
//!
//! Command-line tools for exercising the convergence engine offline.
//!
//! # Commands
//!
//! - `simulate` - Run a participant script against an in-memory host
//! - `fingerprint` - Print the fingerprint of a snapshot document

mod commands;

use clap::{Parser, Subcommand};
use sharesync_host::HostConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// ShareSync command-line tools.
#[derive(Parser)]
#[command(name = "sharesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a participant script against an in-memory host
    Simulate {
        /// Path to the script
        script: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Tick period in milliseconds
        #[arg(long, default_value = "50")]
        tick_ms: u64,

        /// Health ceiling used when a participant's is unknown
        #[arg(long, default_value = "20.0")]
        fallback_max_health: f64,
    },

    /// Print the fingerprint of a snapshot document
    Fingerprint {
        /// Path to the JSON snapshot
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            script,
            format,
            tick_ms,
            fallback_max_health,
        } => {
            let config = HostConfig::default()
                .with_tick_period(Duration::from_millis(tick_ms))
                .with_fallback_max_health(fallback_max_health);
            debug!(script = %script.display(), ?config, "simulating");
            commands::simulate::run(&script, &format, config)?;
        }
        Commands::Fingerprint { file, format } => {
            commands::fingerprint::run(&file, &format)?;
        }
        Commands::Version => {
            println!("ShareSync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("ShareSync Engine v{}", sharesync_engine::VERSION);
        }
    }

    Ok(())
}
