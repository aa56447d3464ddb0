//! CLI application for logging receipts to a rental expense table.

mod commands;
mod review;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, process, samples, store};

/// Receipt capture - OCR a receipt, review the fields, log the expense
#[derive(Parser)]
#[command(name = "rcpt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review and log a single receipt image
    Process(process::ProcessArgs),

    /// Print candidate fields without logging anything
    Extract(extract::ExtractArgs),

    /// Log many receipt images with a fixed property and category
    Batch(batch::BatchArgs),

    /// List the bundled sample receipts
    Samples,

    /// Manage the expense table
    Store(store::StoreArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path),
        Commands::Extract(args) => extract::run(args, config_path),
        Commands::Batch(args) => batch::run(args, config_path),
        Commands::Samples => samples::run(config_path),
        Commands::Store(args) => store::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
