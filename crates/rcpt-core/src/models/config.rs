//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Input and output file locations.
    pub paths: PathsConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Expense table configuration.
    pub store: StoreConfig,
}

/// File and directory locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Property list (`{"properties": [{"name": ...}]}`).
    pub properties: PathBuf,

    /// Category list (`{"categories": [{"name": ..., "schedule_e_line": ...}]}`).
    pub categories: PathBuf,

    /// Expense table file.
    pub spreadsheet: PathBuf,

    /// Directory receiving archived receipt images.
    pub receipt_images_dir: PathBuf,

    /// Sample receipt images for demo runs.
    pub demo_receipts_dir: PathBuf,

    /// Pre-recognized text for the sample receipts (`<stem>.txt`).
    pub demo_ocr_cache_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            properties: PathBuf::from("data/properties.json"),
            categories: PathBuf::from("data/categories.json"),
            spreadsheet: PathBuf::from("data/exports/expenses.csv"),
            receipt_images_dir: PathBuf::from("data/receipt_images"),
            demo_receipts_dir: PathBuf::from("demo/receipts"),
            demo_ocr_cache_dir: PathBuf::from("demo/ocr_cache"),
        }
    }
}

/// Which OCR engine to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// ONNX models when present, cached demo text otherwise.
    #[default]
    Auto,
    /// ONNX detection and recognition models.
    Onnx,
    /// Text files from the demo OCR cache.
    DemoCache,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine selection.
    pub engine: EngineKind,

    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Confidence reported for cached demo text.
    pub cached_confidence: f32,

    /// Keep `[UNK]` glyph markers in recognized text.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Auto,
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            cached_confidence: 0.99,
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Whether the detection and recognition models exist on disk.
    pub fn models_present(&self) -> bool {
        self.model_dir.join(&self.detection_model).exists()
            && self.model_dir.join(&self.recognition_model).exists()
    }
}

/// Expense table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Files smaller than this are treated as damaged and rebuilt.
    pub min_table_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            min_table_bytes: crate::store::DEFAULT_MIN_TABLE_BYTES,
        }
    }
}

impl ReceiptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ReceiptConfig =
            serde_json::from_str(r#"{"ocr": {"engine": "demo-cache"}}"#).unwrap();
        assert_eq!(config.ocr.engine, EngineKind::DemoCache);
        assert_eq!(config.ocr.recognition_model, "latin_rec.onnx");
        assert_eq!(config.paths.spreadsheet, PathBuf::from("data/exports/expenses.csv"));
        assert_eq!(config.store.min_table_bytes, crate::store::DEFAULT_MIN_TABLE_BYTES);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ReceiptConfig::default();
        config.ocr.cached_confidence = 0.5;
        config.save(&path).unwrap();

        let loaded = ReceiptConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.cached_confidence, 0.5);
    }
}
