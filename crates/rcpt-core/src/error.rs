//! Error types for the rcpt-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Expense table error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Receipt image archival error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The image could not be read or decoded.
    #[error("invalid image {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },

    /// Cached OCR text could not be read.
    #[error("failed to read cached text {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the expense table file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the table failed at the filesystem level.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table content could not be parsed or serialized.
    #[error("table format error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The temporary file could not be moved over the table.
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Errors related to copying receipt images into the archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The source image does not exist.
    #[error("source image not found: {0}")]
    MissingSource(PathBuf),

    /// Creating the archive directory or copying the image failed.
    #[error("failed to archive {src} to {dest}: {source}")]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archived path is not below the archive root's parent.
    #[error("archived path {0} is outside the archive root")]
    OutsideRoot(PathBuf),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, ReceiptError>;
