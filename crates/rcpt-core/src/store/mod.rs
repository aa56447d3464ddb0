//! Durable expense table.
//!
//! The table is a single CSV file whose header always equals the current
//! [`ColumnContract`]. Every append is a full read-modify-write, staged in a
//! temporary file next to the table and renamed into place.

mod contract;
mod table;

pub use contract::{columns, ColumnContract, RECEIPT_COLUMNS};
pub use table::{RecordStore, Table, DEFAULT_MIN_TABLE_BYTES};

use std::collections::BTreeMap;

/// One row keyed by column name. Missing keys are stored as empty cells.
pub type Row = BTreeMap<String, String>;
