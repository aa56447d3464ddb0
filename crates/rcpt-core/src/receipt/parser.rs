//! Heuristic receipt parser built from per-field strategy chains.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{ParsedFields, RawOcrResult, EXTRACTION_VERSION};

use super::rules::{
    FirstLineVendor, HintLineDate, KeywordTotal, LabeledTax, LargestAmount, PatternDate,
    StrategyChain, TenderKeyword,
};
use super::ReceiptExtractor;

/// Result of receipt extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Candidate fields for review.
    pub fields: ParsedFields,
    /// Fields the heuristics could not find.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Line-scanning heuristics for vendor, date, total, tax, and payment method.
pub struct FieldHeuristics {
    vendor: StrategyChain<String>,
    date: StrategyChain<NaiveDate>,
    total: StrategyChain<Decimal>,
    tax: StrategyChain<Decimal>,
    payment: StrategyChain<String>,
}

impl FieldHeuristics {
    /// Create a parser with the default rule order.
    pub fn new() -> Self {
        Self {
            vendor: StrategyChain::new().then(FirstLineVendor),
            date: StrategyChain::new()
                .then(PatternDate::month_day_year())
                .then(PatternDate::iso())
                .then(PatternDate::month_name())
                .then(HintLineDate),
            total: StrategyChain::new().then(KeywordTotal).then(LargestAmount),
            tax: StrategyChain::new().then(LabeledTax),
            payment: StrategyChain::new().then(TenderKeyword),
        }
    }

    /// Replace the total rules.
    pub fn with_total_rules(mut self, chain: StrategyChain<Decimal>) -> Self {
        self.total = chain;
        self
    }

    /// Parse candidate fields from raw OCR text.
    pub fn parse(&self, text: &str) -> Extraction {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing receipt from {} characters of text", text.len());

        let vendor = self.vendor.extract(text).unwrap_or_default();
        if vendor.is_empty() {
            warnings.push("Could not extract vendor".to_string());
        }

        let date = self
            .date
            .extract(text)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        if date.is_empty() {
            warnings.push("Could not extract date".to_string());
        }

        let total = self.total.extract(text);
        if total.is_none() {
            warnings.push("Could not extract total".to_string());
        }

        let tax = self.tax.extract(text);
        if tax.is_none() {
            warnings.push("Could not extract tax".to_string());
        }

        let payment_method = self.payment.extract(text).unwrap_or_default();

        let fields = ParsedFields {
            vendor,
            date,
            total,
            tax,
            payment_method,
            extraction_version: EXTRACTION_VERSION.to_string(),
        };

        debug!(
            "Extracted vendor={:?} date={:?} total={:?} tax={:?}",
            fields.vendor, fields.date, fields.total, fields.tax
        );

        Extraction {
            fields,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for FieldHeuristics {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for FieldHeuristics {
    fn extract(&self, ocr_result: &RawOcrResult) -> Extraction {
        let mut extraction = self.parse(&ocr_result.text);
        if ocr_result.is_empty() {
            extraction
                .warnings
                .insert(0, format!("{} returned no text", ocr_result.engine));
        }
        extraction
    }

    fn extract_from_text(&self, text: &str) -> Extraction {
        self.parse(text)
    }
}
