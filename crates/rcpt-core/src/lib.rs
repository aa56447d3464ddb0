//! Core library for receipt capture.
//!
//! This crate provides:
//! - OCR engines behind one capability trait (ONNX models or cached demo text)
//! - Heuristic receipt field extraction (vendor, date, total, tax, payment method)
//! - The expense table store with a versioned column contract
//! - Image archival and the pipeline tying the pieces together

pub mod archive;
pub mod demo;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod receipt;
pub mod store;

pub use archive::ImageArchive;
pub use error::{ReceiptError, Result};
pub use models::{
    ConfirmedRecord, EnrichedSelection, ParsedFields, RawOcrResult, ReceiptConfig, ReceiptInput,
    ReferenceData,
};
pub use ocr::{engine_from_config, CachedTextOcr, OcrEngine};
#[cfg(feature = "native")]
pub use ocr::OnnxOcr;
pub use pipeline::{coerce_amount, Candidate, ReceiptPipeline};
pub use receipt::{Extraction, FieldHeuristics, ReceiptExtractor};
pub use store::{ColumnContract, RecordStore, Row};
