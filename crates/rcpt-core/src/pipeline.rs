//! Receipt pipeline: OCR, field extraction, and the confirmed write.

use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive::ImageArchive;
use crate::error::Result;
use crate::models::{
    round_money, ConfirmedRecord, EnrichedSelection, ParsedFields, RawOcrResult, ReceiptConfig, ReceiptInput,
};
use crate::ocr::OcrEngine;
use crate::receipt::{Extraction, FieldHeuristics, ReceiptExtractor};
use crate::store::{ColumnContract, RecordStore};

/// OCR output and candidate fields for one receipt, awaiting review.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub input: ReceiptInput,
    pub ocr: RawOcrResult,
    pub extraction: Extraction,
}

impl Candidate {
    pub fn fields(&self) -> &ParsedFields {
        &self.extraction.fields
    }
}

/// Runs one receipt at a time from image to table row.
pub struct ReceiptPipeline<'e> {
    engine: &'e dyn OcrEngine,
    heuristics: FieldHeuristics,
    store: RecordStore,
    archive: ImageArchive,
}

impl<'e> ReceiptPipeline<'e> {
    pub fn new(engine: &'e dyn OcrEngine, store: RecordStore, archive: ImageArchive) -> Self {
        Self {
            engine,
            heuristics: FieldHeuristics::new(),
            store,
            archive,
        }
    }

    /// Pipeline writing to the table and archive named in `config`.
    pub fn from_config(engine: &'e dyn OcrEngine, config: &ReceiptConfig) -> Self {
        let store = RecordStore::new(&config.paths.spreadsheet, ColumnContract::receipts())
            .with_min_table_bytes(config.store.min_table_bytes);
        let archive = ImageArchive::new(&config.paths.receipt_images_dir);
        Self::new(engine, store, archive)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn archive(&self) -> &ImageArchive {
        &self.archive
    }

    /// Run OCR on the input image.
    pub fn recognize(&self, input: &ReceiptInput) -> Result<RawOcrResult> {
        info!("Recognizing {} with {}", input.original_filename, self.engine.name());
        Ok(self.engine.recognize(input.path())?)
    }

    /// Candidate fields from OCR output. Never fails.
    pub fn extract(&self, ocr: &RawOcrResult) -> Extraction {
        self.heuristics.extract(ocr)
    }

    /// OCR and extraction in one step.
    pub fn analyze(&self, input: ReceiptInput) -> Result<Candidate> {
        let ocr = self.recognize(&input)?;
        let extraction = self.extract(&ocr);
        debug!(
            "{}: {} warnings after extraction",
            input.original_filename,
            extraction.warnings.len()
        );
        Ok(Candidate {
            input,
            ocr,
            extraction,
        })
    }

    /// Persist a reviewed receipt, stamped with the current local time.
    pub fn confirm(
        &self,
        input: &ReceiptInput,
        reviewed: &ParsedFields,
        selection: &EnrichedSelection,
        ocr_confidence: Option<f32>,
    ) -> Result<ConfirmedRecord> {
        let now = Local::now().naive_local();
        let logged_at = now.with_nanosecond(0).unwrap_or(now);
        self.confirm_at(logged_at, input, reviewed, selection, ocr_confidence)
    }

    /// Persist a reviewed receipt with an explicit timestamp.
    ///
    /// The image is archived before the row is appended. If the append fails
    /// the archived copy is removed again, so a failed confirmation leaves
    /// neither a row nor an orphaned image behind.
    pub fn confirm_at(
        &self,
        logged_at: NaiveDateTime,
        input: &ReceiptInput,
        reviewed: &ParsedFields,
        selection: &EnrichedSelection,
        ocr_confidence: Option<f32>,
    ) -> Result<ConfirmedRecord> {
        let archived = self.archive.archive(input)?;

        let reference = match self.archive.reference_for(&archived) {
            Ok(reference) => reference,
            Err(e) => {
                self.discard(&archived);
                return Err(e.into());
            }
        };

        let record =
            ConfirmedRecord::compose(logged_at, reviewed, selection, reference, ocr_confidence);

        if let Err(e) = self.store.append(&record.to_row()) {
            self.discard(&archived);
            return Err(e.into());
        }

        info!(
            "Logged {} ({}) to {}",
            record.vendor,
            record.image_reference,
            self.store.path().display()
        );
        Ok(record)
    }

    fn discard(&self, archived: &std::path::Path) {
        if let Err(e) = self.archive.remove(archived) {
            warn!(
                "Could not remove archived image {}: {}",
                archived.display(),
                e
            );
        }
    }
}

/// Coerce a reviewer-typed amount to cents. Blank input means no amount.
///
/// Currency symbols, thousands separators, and surrounding whitespace are ignored.
/// Extra decimals round half away from zero.
pub fn coerce_amount(input: &str) -> std::result::Result<Option<Decimal>, rust_decimal::Error> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(&cleaned).map(|amount| Some(round_money(amount)))
}
