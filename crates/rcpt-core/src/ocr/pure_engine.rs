//! ONNX text detection and recognition using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::models::RawOcrResult;

use super::OcrEngine;

/// Engine tag for ONNX recognition.
pub const ONNX_ENGINE_NAME: &str = "onnx";

/// Lines closer than this vertically are read as one row, left to right.
const ROW_HEIGHT: f32 = 20.0;

/// OCR engine backed by `pure-onnx-ocr`. Models load once in the constructor.
pub struct OnnxOcr {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

struct Line {
    top: f32,
    left: f32,
    text: String,
    confidence: f32,
}

impl OnnxOcr {
    /// Load the detection model, recognition model, and dictionary named in `config`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_dir.join(&config.detection_model);
        let rec_path = config.model_dir.join(&config.recognition_model);
        let dict_path = config.model_dir.join(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded OCR models from {}", config.model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }
}

impl OcrEngine for OnnxOcr {
    fn name(&self) -> &str {
        ONNX_ENGINE_NAME
    }

    fn recognize(&self, image_path: &Path) -> Result<RawOcrResult, OcrError> {
        let start = Instant::now();

        let image = image::open(image_path).map_err(|e| OcrError::InvalidImage {
            path: image_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let (width, height) = image.dimensions();
        debug!("Recognizing {} ({}x{})", image_path.display(), width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut lines: Vec<Line> = results
            .iter()
            .map(|r| {
                let (left, top) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                Line {
                    top,
                    left,
                    text,
                    confidence: r.confidence,
                }
            })
            .collect();

        sort_reading_order(&mut lines);

        let confidence = mean_confidence(&lines);
        let text = lines
            .iter()
            .map(|l| l.text.trim())
            .collect::<Vec<_>>()
            .join("\n");

        let elapsed = start.elapsed().as_millis() as u64;
        info!("OCR found {} lines in {}ms", lines.len(), elapsed);

        Ok(RawOcrResult::new(text, confidence, ONNX_ENGINE_NAME).with_processing_time(elapsed))
    }
}

fn sort_reading_order(lines: &mut [Line]) {
    lines.sort_by(|a, b| {
        let row_a = (a.top / ROW_HEIGHT) as i32;
        let row_b = (b.top / ROW_HEIGHT) as i32;
        row_a
            .cmp(&row_b)
            .then_with(|| a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal))
    });
}

fn mean_confidence(lines: &[Line]) -> Option<f32> {
    if lines.is_empty() {
        return None;
    }
    Some(lines.iter().map(|l| l.confidence).sum::<f32>() / lines.len() as f32)
}

/// Smallest x and y over the polygon's corners.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}
