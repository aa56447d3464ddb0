//! Sample receipts shipped for demo runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ocr::CachedTextOcr;

const SAMPLE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One sample image and whether cached text exists for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoSample {
    pub path: PathBuf,
    pub has_cached_text: bool,
}

/// Sample images in `dir`, sorted by path. A missing directory has no samples.
pub fn list_samples(dir: &Path, cache: &CachedTextOcr) -> std::io::Result<Vec<DemoSample>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| SAMPLE_EXTENSIONS.contains(&e.as_str()));
        if path.is_file() && is_image {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| DemoSample {
            has_cached_text: cache.has_text_for(&path),
            path,
        })
        .collect())
}
