//! # sitepress CLI
//!
//! Command-line interface for sitepress conversions: convert markdown batches,
//! archive and preview results, and run retention sweeps (e.g. from cron).

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitepress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to ./sitepress.yml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage root, overriding the config file
    #[arg(long, env = "SITEPRESS_STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// Retention period in days, overriding the config file
    #[arg(long, env = "SITEPRESS_RETENTION_DAYS")]
    retention_days: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown files (or directories of them) into a new site
    Convert {
        /// Markdown files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Identity used to namespace the conversion ID
        #[arg(long)]
        user: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Package a conversion as <storage>/<id>.zip
    Archive {
        /// Conversion ID
        id: String,
    },

    /// Print the preview reference for a conversion
    Preview {
        /// Conversion ID
        id: String,
    },

    /// Delete conversions older than the retention period
    Sweep {
        /// Retention period in days for this run only
        #[arg(long)]
        days: Option<u64>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List conversions in the storage root
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = commands::Settings {
        config: cli.config,
        storage_root: cli.storage_root,
        retention_days: cli.retention_days,
    };
    let service = commands::open_service(&settings)?;

    match cli.command {
        Commands::Convert { paths, user, json } => {
            commands::convert_files(&service, &paths, user.as_deref(), json)
        }
        Commands::Archive { id } => commands::archive_conversion(&service, &id),
        Commands::Preview { id } => commands::show_preview(&service, &id),
        Commands::Sweep { days, json } => commands::sweep_conversions(&service, days, json),
        Commands::List { json } => commands::list_conversions(&service, json),
    }
}
