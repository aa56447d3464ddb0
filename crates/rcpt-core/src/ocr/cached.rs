//! Pre-recognized text for demo runs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::RawOcrResult;

use super::OcrEngine;

/// Engine tag for cached text.
pub const CACHED_ENGINE_NAME: &str = "demo-cache";

/// Reads `<cache_dir>/<image stem>.txt` instead of running recognition.
#[derive(Debug, Clone)]
pub struct CachedTextOcr {
    cache_dir: PathBuf,
    confidence: f32,
}

impl CachedTextOcr {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            confidence: 0.99,
        }
    }

    /// Confidence reported for every cache hit.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Cache file consulted for `image_path`.
    pub fn cache_path(&self, image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.cache_dir.join(format!("{}.txt", stem))
    }

    /// Whether cached text exists for `image_path`.
    pub fn has_text_for(&self, image_path: &Path) -> bool {
        self.cache_path(image_path).is_file()
    }
}

impl OcrEngine for CachedTextOcr {
    fn name(&self) -> &str {
        CACHED_ENGINE_NAME
    }

    fn recognize(&self, image_path: &Path) -> Result<RawOcrResult, OcrError> {
        let start = Instant::now();
        let path = self.cache_path(image_path);

        if !path.exists() {
            warn!("No cached text for {}", image_path.display());
            return Ok(RawOcrResult::new("", None, CACHED_ENGINE_NAME));
        }

        let text = std::fs::read_to_string(&path).map_err(|e| OcrError::Cache {
            path: path.clone(),
            source: e,
        })?;

        debug!("Read {} characters from {}", text.len(), path.display());

        Ok(RawOcrResult::new(text, Some(self.confidence), CACHED_ENGINE_NAME)
            .with_processing_time(start.elapsed().as_millis() as u64))
    }
}
