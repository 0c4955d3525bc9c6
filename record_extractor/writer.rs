use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::assembler::Record;
use crate::filename::{record_filename, section_dir_name, UnsafeSection};
use crate::settings::OnCollision;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    UnsafeSection(#[from] UnsafeSection),
    #[error("cannot create section folder {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub path: PathBuf,
    pub replaced: bool,
}

/// Writes one file per record under `{root}/{section}/`.
///
/// Collisions are tracked per writer, i.e. per parse run, so re-running
/// a parse over the same output root reproduces the same file names.
pub struct RecordWriter {
    root: PathBuf,
    policy: OnCollision,
    written: HashSet<PathBuf>,
}

impl RecordWriter {
    pub fn new(root: impl Into<PathBuf>, policy: OnCollision) -> Self {
        RecordWriter {
            root: root.into(),
            policy,
            written: HashSet::new(),
        }
    }

    pub fn write(&mut self, record: &Record) -> Result<Written, WriteError> {
        let folder = self.root.join(section_dir_name(&record.section)?);
        fs::create_dir_all(&folder).map_err(|source| WriteError::CreateDir {
            path: folder.clone(),
            source,
        })?;

        let filename = record_filename(&record.section, &record.description);
        let (path, replaced) = self.resolve(folder.join(&filename));

        fs::write(&path, format!("{}\n{}\n", record.description, record.url)).map_err(|source| {
            WriteError::Write {
                path: path.clone(),
                source,
            }
        })?;
        debug!(path = %path.display(), "record written");

        self.written.insert(path.clone());
        Ok(Written { path, replaced })
    }

    fn resolve(&self, path: PathBuf) -> (PathBuf, bool) {
        if !self.written.contains(&path) {
            return (path, false);
        }
        match self.policy {
            OnCollision::Overwrite => {
                warn!(path = %path.display(), "two records share a file name; overwriting");
                (path, true)
            }
            OnCollision::Suffix => {
                let mut n = 2;
                let mut numbered = with_suffix(&path, n);
                while self.written.contains(&numbered) {
                    n += 1;
                    numbered = with_suffix(&path, n);
                }
                debug!(path = %numbered.display(), "file name taken; numbered");
                (numbered, false)
            }
        }
    }
}

fn with_suffix(path: &Path, n: usize) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    path.with_file_name(format!("{stem}-{n}.txt"))
}
