//! Copies of confirmed receipt images, named by receipt id.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::ArchiveError;
use crate::models::ReceiptInput;

/// Extension used when the source image has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Directory holding `<id><ext>` copies of receipt images.
#[derive(Debug, Clone)]
pub struct ImageArchive {
    dir: PathBuf,
}

impl ImageArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Archive location for `input`, without copying anything.
    pub fn destination(&self, input: &ReceiptInput) -> PathBuf {
        let extension = input
            .path()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        self.dir.join(format!("{}.{}", input.image_id, extension))
    }

    /// Copy the source image into the archive and return the new path.
    pub fn archive(&self, input: &ReceiptInput) -> Result<PathBuf, ArchiveError> {
        let src = input.path();
        if !src.is_file() {
            return Err(ArchiveError::MissingSource(src.to_path_buf()));
        }

        let dest = self.destination(input);
        let copy_error = |source| ArchiveError::Copy {
            src: src.to_path_buf(),
            dest: dest.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(copy_error)?;
        fs::copy(src, &dest).map_err(copy_error)?;

        info!("Archived {} as {}", input.original_filename, dest.display());
        Ok(dest)
    }

    /// Path stored in the table: relative to the archive directory's parent,
    /// with `/` separators.
    pub fn reference_for(&self, archived: &Path) -> Result<String, ArchiveError> {
        let root = self.dir.parent().unwrap_or(Path::new(""));
        let relative = archived
            .strip_prefix(root)
            .map_err(|_| ArchiveError::OutsideRoot(archived.to_path_buf()))?;

        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        Ok(parts.join("/"))
    }

    /// Delete an archived copy.
    pub fn remove(&self, archived: &Path) -> std::io::Result<()> {
        debug!("Removing archived image {}", archived.display());
        fs::remove_file(archived)
    }
}
