//! Extract command - print candidate fields without logging anything.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args};
use console::style;
use serde::Serialize;

use rcpt_core::{Extraction, FieldHeuristics, ReceiptExtractor, ReceiptInput, ReceiptPipeline};

use super::{build_engine, format_fields, load_config};

/// Arguments for the extract command.
#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["image", "text"])))]
pub struct ExtractArgs {
    /// Receipt image to run OCR on
    image: Option<PathBuf>,

    /// Read receipt text from a file instead of running OCR
    #[arg(long, value_name = "FILE")]
    text: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ocr_confidence: Option<f32>,
    #[serde(flatten)]
    extraction: &'a Extraction,
}

pub fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let output = match (&args.text, &args.image) {
        (Some(text_path), _) => {
            let text = fs::read_to_string(text_path).map_err(|e| {
                anyhow::anyhow!("Failed to read {}: {}", text_path.display(), e)
            })?;
            let extraction = FieldHeuristics::new().extract_from_text(&text);
            render(
                ExtractOutput {
                    source: text_path.display().to_string(),
                    engine: None,
                    ocr_confidence: None,
                    extraction: &extraction,
                },
                args.format,
            )?
        }
        (None, Some(image)) => {
            if !image.exists() {
                anyhow::bail!("Input file not found: {}", image.display());
            }
            let config = load_config(config_path)?;
            let engine = build_engine(&config)?;
            let pipeline = ReceiptPipeline::from_config(engine.as_ref(), &config);
            let candidate = pipeline.analyze(ReceiptInput::new(image))?;
            render(
                ExtractOutput {
                    source: image.display().to_string(),
                    engine: Some(candidate.ocr.engine.clone()),
                    ocr_confidence: candidate.ocr.confidence,
                    extraction: &candidate.extraction,
                },
                args.format,
            )?
        }
        (None, None) => anyhow::bail!("Provide an image or --text <FILE>"),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn render(output: ExtractOutput<'_>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => {
            let mut text = format_fields(&output.extraction.fields);
            if let Some(confidence) = output.ocr_confidence {
                text.push_str(&format!("OCR confidence: {:.1}%\n", confidence * 100.0));
            }
            for warning in &output.extraction.warnings {
                text.push_str(&format!("Warning: {}\n", warning));
            }
            Ok(text)
        }
    }
}
