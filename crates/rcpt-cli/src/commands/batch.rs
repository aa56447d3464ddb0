//! Batch command - log many receipt images without prompting.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use rcpt_core::{ReceiptInput, ReceiptPipeline, ReferenceData};

use super::{build_engine, load_config};
use super::process::FieldOverrides;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for receipt images (e.g. "inbox/*.jpg")
    #[arg(required = true)]
    input: String,

    /// Property every receipt is logged against
    #[arg(long)]
    property: Option<String>,

    /// Category every receipt is logged under
    #[arg(long)]
    category: Option<String>,

    /// Notes added to every row
    #[arg(long)]
    notes: Option<String>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

struct Failure {
    path: PathBuf,
    error: String,
}

pub fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} receipts to log",
        style("ℹ").blue(),
        files.len()
    );

    let references = ReferenceData::load(&config.paths.properties, &config.paths.categories)?;
    let selection = FieldOverrides {
        property: args.property.clone(),
        category: args.category.clone(),
        notes: args.notes.clone(),
        ..FieldOverrides::default()
    }
    .selection(&references);

    let engine = build_engine(&config)?;
    let pipeline = ReceiptPipeline::from_config(engine.as_ref(), &config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} receipts")?
            .progress_chars("=>-"),
    );

    let mut logged = 0usize;
    let mut failures = Vec::new();

    for path in files {
        let result = pipeline.analyze(ReceiptInput::new(&path)).and_then(|candidate| {
            pipeline.confirm(
                &candidate.input,
                candidate.fields(),
                &selection,
                candidate.ocr.confidence,
            )
        });

        match result {
            Ok(_) => logged += 1,
            Err(e) if args.continue_on_error => {
                warn!("Failed to log {}: {}", path.display(), e);
                failures.push(Failure {
                    path,
                    error: e.to_string(),
                });
            }
            Err(e) => {
                pb.abandon();
                error!("Failed to log {}: {}", path.display(), e);
                anyhow::bail!("Processing failed after {} receipts: {}", logged, e);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    println!(
        "{} Logged {} receipts to {} in {:?}",
        style("✓").green(),
        logged,
        pipeline.store().path().display(),
        start.elapsed()
    );

    if !failures.is_empty() {
        println!("{} {} failed:", style("✗").red(), failures.len());
        for failure in &failures {
            println!("  {}: {}", failure.path.display(), failure.error);
        }
    }

    Ok(())
}
