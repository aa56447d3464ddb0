//! Data models for receipts, configuration, and reference data.

pub mod config;
pub mod receipt;
pub mod reference;

pub use config::ReceiptConfig;
pub use receipt::{
    ConfirmedRecord, EnrichedSelection, ParsedFields, RawOcrResult, ReceiptInput,
    EXTRACTION_VERSION, round_money,
};
pub use reference::{Category, Property, ReferenceData};
