//! Process command - review a single receipt and log it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rcpt_core::{
    coerce_amount, Candidate, EnrichedSelection, ParsedFields, ReceiptInput, ReceiptPipeline,
    ReferenceData,
};

use super::{build_engine, format_fields, load_config};
use crate::review::Reviewer;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Receipt image (JPG or PNG)
    #[arg(required = true)]
    image: PathBuf,

    /// Accept the fields without prompting
    #[arg(short, long)]
    yes: bool,

    #[command(flatten)]
    overrides: FieldOverrides,
}

/// Values that replace the extracted candidates before review.
#[derive(Args, Default)]
pub struct FieldOverrides {
    /// Vendor name
    #[arg(long)]
    pub vendor: Option<String>,

    /// Receipt date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Receipt total
    #[arg(long)]
    pub total: Option<String>,

    /// Tax amount
    #[arg(long)]
    pub tax: Option<String>,

    /// Payment method
    #[arg(long)]
    pub payment_method: Option<String>,

    /// Property the expense belongs to
    #[arg(long)]
    pub property: Option<String>,

    /// Expense category
    #[arg(long)]
    pub category: Option<String>,

    /// Reporting line (defaults to the category's line)
    #[arg(long)]
    pub schedule_line: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl FieldOverrides {
    /// Apply the field overrides to extracted candidates.
    pub fn apply(&self, fields: &mut ParsedFields) -> anyhow::Result<()> {
        if let Some(vendor) = &self.vendor {
            fields.vendor = vendor.clone();
        }
        if let Some(date) = &self.date {
            fields.date = date.clone();
        }
        if let Some(total) = &self.total {
            fields.total = coerce_amount(total)
                .map_err(|e| anyhow::anyhow!("Invalid --total {:?}: {}", total, e))?;
        }
        if let Some(tax) = &self.tax {
            fields.tax = coerce_amount(tax)
                .map_err(|e| anyhow::anyhow!("Invalid --tax {:?}: {}", tax, e))?;
        }
        if let Some(payment_method) = &self.payment_method {
            fields.payment_method = payment_method.clone();
        }
        Ok(())
    }

    /// Selection from the flags, falling back to the first option of each list.
    pub fn selection(&self, references: &ReferenceData) -> EnrichedSelection {
        let property = self
            .property
            .clone()
            .or_else(|| references.property_names().into_iter().next())
            .unwrap_or_default();
        let category = self
            .category
            .clone()
            .or_else(|| references.category_names().into_iter().next())
            .unwrap_or_default();
        let schedule_line = self
            .schedule_line
            .clone()
            .unwrap_or_else(|| references.schedule_line_for(&category));

        EnrichedSelection::new(
            property,
            category,
            schedule_line,
            self.notes.clone().unwrap_or_default(),
        )
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.image.exists() {
        anyhow::bail!("Input file not found: {}", args.image.display());
    }

    let references = ReferenceData::load(&config.paths.properties, &config.paths.categories)?;
    let engine = build_engine(&config)?;
    let pipeline = ReceiptPipeline::from_config(engine.as_ref(), &config);

    info!("Processing {}", args.image.display());
    let candidate = pipeline.analyze(ReceiptInput::new(&args.image))?;
    print_candidate(&candidate);

    let mut fields = candidate.fields().clone();
    args.overrides.apply(&mut fields)?;
    let mut selection = args.overrides.selection(&references);

    if !args.yes {
        let mut reviewer = Reviewer::stdio();
        review(&mut reviewer, &references, &mut fields, &mut selection)?;

        println!();
        print!("{}", format_fields(&fields));
        println!("Property:       {}", selection.property_name);
        println!("Category:       {}", selection.category_name);
        if !reviewer.confirm("Log this receipt?")? {
            println!("{} Receipt discarded, nothing was written.", style("ℹ").blue());
            return Ok(());
        }
    }

    let record = pipeline.confirm(
        &candidate.input,
        &fields,
        &selection,
        candidate.ocr.confidence,
    )?;

    println!(
        "{} Logged {} ({}) to {}",
        style("✓").green(),
        if record.vendor.is_empty() { "receipt" } else { record.vendor.as_str() },
        record.image_reference,
        pipeline.store().path().display()
    );

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn print_candidate(candidate: &Candidate) {
    println!(
        "{} {} via {}",
        style("ℹ").blue(),
        candidate.input.original_filename,
        candidate.ocr.engine
    );
    print!("{}", format_fields(candidate.fields()));
    if let Some(confidence) = candidate.ocr.confidence {
        println!("OCR confidence: {:.1}%", confidence * 100.0);
    }
    for warning in &candidate.extraction.warnings {
        println!("{} {}", style("⚠").yellow(), warning);
    }
    println!();
}

/// Walk the reviewer through every field.
pub fn review<R: std::io::BufRead, W: std::io::Write>(
    reviewer: &mut Reviewer<R, W>,
    references: &ReferenceData,
    fields: &mut ParsedFields,
    selection: &mut EnrichedSelection,
) -> anyhow::Result<()> {
    reviewer.say("Press Enter to keep a value, '-' to clear it.")?;

    fields.vendor = reviewer.text("Vendor", &fields.vendor)?;
    fields.date = reviewer.text("Date (YYYY-MM-DD)", &fields.date)?;
    fields.total = reviewer.amount("Total", fields.total)?;
    fields.tax = reviewer.amount("Tax", fields.tax)?;
    fields.payment_method = reviewer.text("Payment method", &fields.payment_method)?;

    let properties = references.property_names();
    let current = position_of(&properties, &selection.property_name);
    selection.property_name = reviewer.choose("Property", &properties, current)?;

    let categories = references.category_names();
    let current = position_of(&categories, &selection.category_name);
    let previous_category = selection.category_name.clone();
    selection.category_name = reviewer.choose("Category", &categories, current)?;
    if selection.category_name != previous_category {
        selection.schedule_line = references.schedule_line_for(&selection.category_name);
    }

    selection.schedule_line = reviewer.text("Schedule E line", &selection.schedule_line)?;
    selection.notes = reviewer.text("Notes", &selection.notes)?;
    Ok(())
}

fn position_of(options: &[String], value: &str) -> usize {
    options.iter().position(|o| o == value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rcpt_core::models::{Category, Property};
    use rust_decimal::Decimal;
    use std::io::Cursor;

    fn references() -> ReferenceData {
        ReferenceData {
            properties: vec![
                Property { name: "Maple St".to_string() },
                Property { name: "Oak Ave".to_string() },
            ],
            categories: vec![
                Category {
                    name: "Repairs".to_string(),
                    schedule_e_line: "Line 14".to_string(),
                },
                Category {
                    name: "Supplies".to_string(),
                    schedule_e_line: "Line 15".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = FieldOverrides {
            total: Some("19.99".to_string()),
            tax: Some("".to_string()),
            vendor: Some("Shop".to_string()),
            ..FieldOverrides::default()
        };
        let mut fields = ParsedFields {
            tax: Some(Decimal::ONE),
            ..ParsedFields::default()
        };

        overrides.apply(&mut fields).unwrap();
        assert_eq!(fields.vendor, "Shop");
        assert_eq!(fields.total, Some(Decimal::new(1999, 2)));
        assert_eq!(fields.tax, None);
    }

    #[test]
    fn test_invalid_override_amount() {
        let overrides = FieldOverrides {
            total: Some("lots".to_string()),
            ..FieldOverrides::default()
        };
        assert!(overrides.apply(&mut ParsedFields::default()).is_err());
    }

    #[test]
    fn test_selection_defaults_and_schedule_line() {
        let refs = references();
        let selection = FieldOverrides::default().selection(&refs);
        assert_eq!(selection.property_name, "Maple St");
        assert_eq!(selection.category_name, "Repairs");
        assert_eq!(selection.schedule_line, "Line 14");

        let selection = FieldOverrides {
            category: Some("Supplies".to_string()),
            ..FieldOverrides::default()
        }
        .selection(&refs);
        assert_eq!(selection.schedule_line, "Line 15");
    }

    #[test]
    fn test_review_walkthrough() {
        let refs = references();
        let mut fields = ParsedFields {
            vendor: "Corner Hardware".to_string(),
            total: Some(Decimal::new(4500, 2)),
            ..ParsedFields::default()
        };
        let mut selection = FieldOverrides::default().selection(&refs);

        // vendor, date, total, tax, payment, property, category, schedule line, notes
        let input = "\n2026-03-03\n\n3.15\nCash\n2\nSupplies\n\nfaucet\n";
        let mut reviewer = Reviewer::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        review(&mut reviewer, &refs, &mut fields, &mut selection).unwrap();

        assert_eq!(fields.vendor, "Corner Hardware");
        assert_eq!(fields.date, "2026-03-03");
        assert_eq!(fields.total, Some(Decimal::new(4500, 2)));
        assert_eq!(fields.tax, Some(Decimal::new(315, 2)));
        assert_eq!(fields.payment_method, "Cash");
        assert_eq!(
            selection,
            EnrichedSelection::new("Oak Ave", "Supplies", "Line 15", "faucet")
        );
    }
}
