//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{Extraction, FieldHeuristics};

use crate::models::RawOcrResult;

/// Trait for receipt field extractors.
///
/// Extraction never fails: fields that cannot be found are left empty and
/// reported as warnings for the reviewer.
pub trait ReceiptExtractor {
    /// Extract candidate fields from an OCR result.
    fn extract(&self, ocr_result: &RawOcrResult) -> Extraction;

    /// Extract candidate fields from plain text.
    fn extract_from_text(&self, text: &str) -> Extraction;
}
