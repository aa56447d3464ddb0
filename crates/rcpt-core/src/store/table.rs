//! CSV-backed record store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::ConfirmedRecord;

use super::{ColumnContract, Row};

/// Files shorter than this are checked for a truncated header. They are
/// rebuilt only when no header cell names a contract column.
pub const DEFAULT_MIN_TABLE_BYTES: u64 = 16;

/// In-memory copy of the table file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names in file order.
    pub header: Vec<String>,
    /// Cells per row, aligned with `header`. Empty cells are nulls.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// A table with the given header and no rows.
    pub fn with_header(header: &[String]) -> Self {
        Self {
            header: header.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|c| c == column)
    }

    /// Cell at `row` / `column`.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// Add a column, null for every existing row.
    pub fn add_column(&mut self, column: &str) {
        self.header.push(column.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    /// Append a row. Keys that are not columns of this table are ignored.
    pub fn push_row(&mut self, row: &Row) {
        let cells = self
            .header
            .iter()
            .map(|c| row.get(c).cloned().unwrap_or_default())
            .collect();
        self.rows.push(cells);
    }

    /// Reorder and reduce the columns to exactly `contract`.
    pub fn project(&self, contract: &ColumnContract) -> Table {
        let indices: Vec<Option<usize>> = contract
            .columns()
            .iter()
            .map(|c| self.column_index(c))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|i| i.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Table {
            header: contract.columns().to_vec(),
            rows,
        }
    }

    /// Row as a column-name map, leaving out empty cells.
    pub fn row(&self, index: usize) -> Option<Row> {
        let cells = self.rows.get(index)?;
        Some(
            self.header
                .iter()
                .zip(cells)
                .filter(|(_, value)| !value.is_empty())
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect(),
        )
    }
}

/// The expense table file.
///
/// Not safe for concurrent writers: each append reads and rewrites the whole file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    contract: ColumnContract,
    min_table_bytes: u64,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, contract: ColumnContract) -> Self {
        Self {
            path: path.into(),
            contract,
            min_table_bytes: DEFAULT_MIN_TABLE_BYTES,
        }
    }

    /// Set the size below which an existing file is rebuilt.
    pub fn with_min_table_bytes(mut self, bytes: u64) -> Self {
        self.min_table_bytes = bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contract(&self) -> &ColumnContract {
        &self.contract
    }

    /// Make sure the table file exists with at least a header row.
    ///
    /// Creates the parent directory, deletes an implausibly small file, and
    /// writes a header-only table when the file is absent. Idempotent.
    pub fn ensure(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        if let Ok(metadata) = fs::metadata(&self.path) {
            if metadata.is_file()
                && metadata.len() < self.min_table_bytes
                && !self.header_names_contract_column()
            {
                warn!(
                    "Table {} is only {} bytes with no usable header, rebuilding",
                    self.path.display(),
                    metadata.len()
                );
                fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
            }
        }

        if !self.path.exists() {
            info!("Creating table {}", self.path.display());
            self.write(&Table::with_header(self.contract.columns()))?;
        }

        Ok(())
    }

    /// Append one row, bringing the file up to the current contract.
    ///
    /// Contract columns missing from the file are added with nulls, columns
    /// outside the contract are dropped, and the file is rewritten in
    /// contract order. On failure the previous file is left untouched.
    pub fn append(&self, row: &Row) -> Result<(), StoreError> {
        self.ensure()?;

        let mut table = self.load()?;

        for column in self.contract.columns() {
            if table.column_index(column).is_none() {
                debug!("Back-filling column {:?}", column);
                table.add_column(column);
            }
        }

        table.push_row(row);

        let table = table.project(&self.contract);
        self.write(&table)?;

        debug!("Appended row {} to {}", table.len(), self.path.display());
        Ok(())
    }

    /// Read the table in contract column order. An absent file reads as empty.
    pub fn read(&self) -> Result<Table, StoreError> {
        if !self.path.exists() {
            return Ok(Table::with_header(self.contract.columns()));
        }
        Ok(self.load()?.project(&self.contract))
    }

    /// Decode every row that carries a complete record.
    pub fn records(&self) -> Result<Vec<ConfirmedRecord>, StoreError> {
        let table = self.read()?;
        let records = (0..table.len())
            .filter_map(|i| table.row(i))
            .filter_map(|row| ConfirmedRecord::from_row(&row))
            .collect();
        Ok(records)
    }

    fn header_names_contract_column(&self) -> bool {
        let Ok(mut reader) = csv::ReaderBuilder::new().flexible(true).from_path(&self.path) else {
            return false;
        };
        match reader.headers() {
            Ok(header) => header.iter().any(|h| self.contract.contains(h.trim())),
            Err(_) => false,
        }
    }

    fn load(&self) -> Result<Table, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| self.csv_error(e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.csv_error(e))?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            cells.resize(header.len(), String::new());
            rows.push(cells);
        }

        Ok(Table { header, rows })
    }

    fn write(&self, table: &Table) -> Result<(), StoreError> {
        let dir = self.parent_dir().unwrap_or(Path::new("."));
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;

        {
            let mut writer = csv::Writer::from_writer(staged.as_file_mut());
            writer
                .write_record(&table.header)
                .map_err(|e| self.csv_error(e))?;
            for row in &table.rows {
                writer.write_record(row).map_err(|e| self.csv_error(e))?;
            }
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        staged.as_file().sync_all().map_err(|e| self.io_error(e))?;

        staged.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}
