use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("cannot create output folder {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// `notes.v2.txt` -> `notes.svg`: the base name up to its first dot.
///
/// Every url found in one input file maps to this same name.
pub fn image_name(input: &Path) -> String {
    let base = input
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = base.split('.').next().unwrap_or_default();
    format!("{stem}.svg")
}

pub struct ImageWriter {
    folder: PathBuf,
}

impl ImageWriter {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        ImageWriter {
            folder: folder.into(),
        }
    }

    pub fn save(&self, name: &str, svg: &str) -> Result<PathBuf, ImageError> {
        if !self.folder.is_dir() {
            fs::create_dir_all(&self.folder).map_err(|source| ImageError::CreateDir {
                path: self.folder.clone(),
                source,
            })?;
        }
        let path = self.folder.join(name);
        fs::write(&path, svg).map_err(|source| ImageError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
