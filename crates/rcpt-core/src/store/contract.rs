//! Ordered, versioned column set of the expense table.

use serde::{Deserialize, Serialize};

/// Column names of the receipt table.
pub mod columns {
    pub const LOGGED_AT: &str = "Logged At";
    pub const RECEIPT_DATE: &str = "Receipt Date";
    pub const VENDOR: &str = "Vendor";
    pub const TOTAL: &str = "Total";
    pub const TAX: &str = "Tax";
    pub const CATEGORY: &str = "Category";
    pub const SCHEDULE_LINE: &str = "Schedule E Line";
    pub const PROPERTY: &str = "Property";
    pub const PAYMENT_METHOD: &str = "Payment Method";
    pub const NOTES: &str = "Notes";
    pub const IMAGE_PATH: &str = "Image Path";
    pub const OCR_CONFIDENCE: &str = "OCR Confidence";
}

/// Receipt table columns, in file order.
pub const RECEIPT_COLUMNS: [&str; 12] = [
    columns::LOGGED_AT,
    columns::RECEIPT_DATE,
    columns::VENDOR,
    columns::TOTAL,
    columns::TAX,
    columns::CATEGORY,
    columns::SCHEDULE_LINE,
    columns::PROPERTY,
    columns::PAYMENT_METHOD,
    columns::NOTES,
    columns::IMAGE_PATH,
    columns::OCR_CONFIDENCE,
];

/// The authoritative column set of a table. Changing it means bumping `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnContract {
    version: u32,
    columns: Vec<String>,
}

impl ColumnContract {
    pub fn new<I, S>(version: u32, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// The shipped receipt contract.
    pub fn receipts() -> Self {
        Self::new(1, RECEIPT_COLUMNS)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

impl Default for ColumnContract {
    fn default() -> Self {
        Self::receipts()
    }
}
