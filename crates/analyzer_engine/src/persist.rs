use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use analyzer_logging::analyzer_warn;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::DownloadArtifact;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {path:?} as the report directory: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("refusing to save report as {0:?}: not a plain file name")]
    InvalidFileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates the report directory when missing; fails if the path is something else.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let output_dir_error = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(output_dir_error("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| output_dir_error(err.to_string()))
        }
        Err(err) => Err(output_dir_error(err.to_string())),
    }
}

/// Saves reports inside one directory, replacing any file of the same name.
///
/// Bytes go to a temp file in the same directory first, so a failed write
/// never leaves a truncated report behind.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        if !is_plain_file_name(filename) {
            analyzer_warn!("Rejected report file name {:?}", filename);
            return Err(PersistError::InvalidFileName(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file_mut().sync_all()?;

        let target = self.dir.join(filename);
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}

/// Exactly one normal path component: no separators, no `..`, no root or prefix.
fn is_plain_file_name(filename: &str) -> bool {
    if filename.contains(|c: char| c == '/' || c == '\\') {
        return false;
    }
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Saves a downloaded report under its derived filename inside `dir`.
pub fn save_artifact(dir: &Path, artifact: &DownloadArtifact) -> Result<PathBuf, PersistError> {
    AtomicFileWriter::new(dir.to_path_buf()).write(&artifact.filename, &artifact.bytes)
}
