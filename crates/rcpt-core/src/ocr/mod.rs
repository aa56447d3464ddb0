//! OCR engines that turn a receipt image into raw text.
//!
//! Engines are built once per process and passed by reference. They hold no
//! mutable state, so one instance can serve any number of sequential calls.

mod cached;
#[cfg(feature = "native")]
mod pure_engine;

pub use cached::{CachedTextOcr, CACHED_ENGINE_NAME};
#[cfg(feature = "native")]
pub use pure_engine::{OnnxOcr, ONNX_ENGINE_NAME};

use std::path::Path;

use tracing::info;

use crate::error::OcrError;
use crate::models::config::{EngineKind, OcrConfig};
use crate::models::RawOcrResult;

/// Image to text recognition.
pub trait OcrEngine {
    /// Engine tag recorded on every result.
    fn name(&self) -> &str;

    /// Recognize the text in one image.
    ///
    /// Unreadable content yields empty text, not an error. Errors are reserved
    /// for images that cannot be opened and engine failures.
    fn recognize(&self, image_path: &Path) -> Result<RawOcrResult, OcrError>;
}

/// Build the engine selected by `config`.
///
/// `auto` picks the ONNX engine when its models are on disk and falls back to
/// the demo text cache in `cache_dir` otherwise.
pub fn engine_from_config(
    config: &OcrConfig,
    cache_dir: &Path,
) -> Result<Box<dyn OcrEngine>, OcrError> {
    let cached = || -> Box<dyn OcrEngine> {
        Box::new(CachedTextOcr::new(cache_dir).with_confidence(config.cached_confidence))
    };

    match config.engine {
        EngineKind::DemoCache => Ok(cached()),
        EngineKind::Onnx => onnx_engine(config),
        EngineKind::Auto if config.models_present() => onnx_engine(config),
        EngineKind::Auto => {
            info!(
                "No OCR models in {}, using cached text from {}",
                config.model_dir.display(),
                cache_dir.display()
            );
            Ok(cached())
        }
    }
}

#[cfg(feature = "native")]
fn onnx_engine(config: &OcrConfig) -> Result<Box<dyn OcrEngine>, OcrError> {
    Ok(Box::new(OnnxOcr::from_config(config)?))
}

#[cfg(not(feature = "native"))]
fn onnx_engine(_config: &OcrConfig) -> Result<Box<dyn OcrEngine>, OcrError> {
    tracing::warn!("ONNX engine requested but rcpt-core was built without the `native` feature");
    Err(OcrError::ModelLoad(
        "ONNX OCR support is not compiled in".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_without_models_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = OcrConfig {
            model_dir: dir.path().join("no-models"),
            ..OcrConfig::default()
        };

        let engine = engine_from_config(&config, dir.path()).unwrap();
        assert_eq!(engine.name(), CACHED_ENGINE_NAME);
    }

    #[test]
    fn test_explicit_demo_cache() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("r1.txt"), "Shop\nTOTAL 4.00\n").unwrap();
        let config = OcrConfig {
            engine: EngineKind::DemoCache,
            cached_confidence: 0.5,
            ..OcrConfig::default()
        };

        let engine = engine_from_config(&config, dir.path()).unwrap();
        let result = engine.recognize(Path::new("uploads/r1.jpg")).unwrap();
        assert_eq!(result.confidence, Some(0.5));
        assert!(result.text.contains("TOTAL"));
    }

    #[test]
    fn test_onnx_without_models_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = OcrConfig {
            engine: EngineKind::Onnx,
            model_dir: dir.path().to_path_buf(),
            ..OcrConfig::default()
        };

        let result = engine_from_config(&config, dir.path());
        assert!(matches!(result, Err(OcrError::ModelLoad(_))));
    }
}
