//! Receipt data models, from raw OCR output to the confirmed table row.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::store::columns;
use crate::store::Row;

/// Tag identifying which extraction logic produced a set of fields.
pub const EXTRACTION_VERSION: &str = "v1-heuristic";

/// Timestamp layout used for the "Logged At" column.
pub const LOGGED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Round a money amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A receipt image entering the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptInput {
    /// Path of the uploaded or selected image.
    pub image_path: PathBuf,

    /// Unique identifier used to name the archived copy.
    pub image_id: String,

    /// File name as originally supplied.
    pub original_filename: String,
}

impl ReceiptInput {
    /// Create an input with a fresh identifier.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        let image_path = image_path.into();
        let original_filename = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            image_path,
            image_id: uuid::Uuid::new_v4().simple().to_string(),
            original_filename,
        }
    }

    /// Use a caller-chosen identifier instead of a random one.
    pub fn with_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = image_id.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.image_path
    }
}

/// Text produced by an OCR engine for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOcrResult {
    /// Recognized text, lines separated by newlines.
    pub text: String,

    /// Mean recognition confidence (0.0 - 1.0), if the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Name of the engine that produced the text.
    pub engine: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl RawOcrResult {
    pub fn new(text: impl Into<String>, confidence: Option<f32>, engine: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
            engine: engine.into(),
            processing_time_ms: 0,
        }
    }

    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Candidate fields guessed from OCR text, editable before confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    /// Business name (first line of the receipt).
    pub vendor: String,

    /// Receipt date as `YYYY-MM-DD`, or empty.
    pub date: String,

    /// Receipt total.
    pub total: Option<Decimal>,

    /// Tax amount.
    pub tax: Option<Decimal>,

    /// Tender used (card brand, cash), or empty.
    pub payment_method: String,

    /// Extraction logic tag.
    pub extraction_version: String,
}

impl Default for ParsedFields {
    fn default() -> Self {
        Self {
            vendor: String::new(),
            date: String::new(),
            total: None,
            tax: None,
            payment_method: String::new(),
            extraction_version: EXTRACTION_VERSION.to_string(),
        }
    }
}

/// Property and category chosen during review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSelection {
    pub property_name: String,
    pub category_name: String,
    /// Reporting line label for the category (e.g. "Line 14").
    pub schedule_line: String,
    pub notes: String,
}

impl EnrichedSelection {
    pub fn new(
        property_name: impl Into<String>,
        category_name: impl Into<String>,
        schedule_line: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            category_name: category_name.into(),
            schedule_line: schedule_line.into(),
            notes: notes.into(),
        }
    }
}

/// A human-approved receipt, one row of the expense table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedRecord {
    pub logged_at: NaiveDateTime,
    pub receipt_date: String,
    pub vendor: String,
    pub total: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub category: String,
    pub schedule_line: String,
    pub property: String,
    pub payment_method: String,
    pub notes: String,
    /// Archived image path, relative to the archive root's parent.
    pub image_reference: String,
    pub ocr_confidence: Option<f32>,
}

impl ConfirmedRecord {
    /// Fold reviewed fields and the selection into a record.
    ///
    /// Money is rounded to cents here so the record equals what the table stores.
    pub fn compose(
        logged_at: NaiveDateTime,
        fields: &ParsedFields,
        selection: &EnrichedSelection,
        image_reference: impl Into<String>,
        ocr_confidence: Option<f32>,
    ) -> Self {
        Self {
            logged_at,
            receipt_date: fields.date.clone(),
            vendor: fields.vendor.clone(),
            total: fields.total.map(round_money),
            tax: fields.tax.map(round_money),
            category: selection.category_name.clone(),
            schedule_line: selection.schedule_line.clone(),
            property: selection.property_name.clone(),
            payment_method: fields.payment_method.clone(),
            notes: selection.notes.clone(),
            image_reference: image_reference.into(),
            ocr_confidence,
        }
    }

    /// Render the record as a table row keyed by column name.
    ///
    /// Absent values are left out of the row and stored as empty cells.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        let mut put = |column: &str, value: String| {
            row.insert(column.to_string(), value);
        };

        put(columns::LOGGED_AT, self.logged_at.format(LOGGED_AT_FORMAT).to_string());
        put(columns::RECEIPT_DATE, self.receipt_date.clone());
        put(columns::VENDOR, self.vendor.clone());
        if let Some(total) = self.total {
            put(columns::TOTAL, format!("{:.2}", total));
        }
        if let Some(tax) = self.tax {
            put(columns::TAX, format!("{:.2}", tax));
        }
        put(columns::CATEGORY, self.category.clone());
        put(columns::SCHEDULE_LINE, self.schedule_line.clone());
        put(columns::PROPERTY, self.property.clone());
        put(columns::PAYMENT_METHOD, self.payment_method.clone());
        put(columns::NOTES, self.notes.clone());
        put(columns::IMAGE_PATH, self.image_reference.clone());
        if let Some(confidence) = self.ocr_confidence {
            put(columns::OCR_CONFIDENCE, format!("{:.4}", confidence));
        }

        row
    }

    /// Decode a row read back from the table.
    ///
    /// Returns `None` when the row has no parseable "Logged At" timestamp,
    /// which only happens for rows written under an older column contract.
    pub fn from_row(row: &Row) -> Option<Self> {
        let text = |column: &str| row.get(column).cloned().unwrap_or_default();
        let amount = |column: &str| {
            row.get(column)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .and_then(|s| Decimal::from_str(s).ok())
        };

        let logged_at =
            NaiveDateTime::parse_from_str(row.get(columns::LOGGED_AT)?.trim(), LOGGED_AT_FORMAT)
                .ok()?;

        Some(Self {
            logged_at,
            receipt_date: text(columns::RECEIPT_DATE),
            vendor: text(columns::VENDOR),
            total: amount(columns::TOTAL),
            tax: amount(columns::TAX),
            category: text(columns::CATEGORY),
            schedule_line: text(columns::SCHEDULE_LINE),
            property: text(columns::PROPERTY),
            payment_method: text(columns::PAYMENT_METHOD),
            notes: text(columns::NOTES),
            image_reference: text(columns::IMAGE_PATH),
            ocr_confidence: row
                .get(columns::OCR_CONFIDENCE)
                .and_then(|s| s.trim().parse::<f32>().ok()),
        })
    }
}
