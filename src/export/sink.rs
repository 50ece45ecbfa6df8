//! Destinations for generated documents

use crate::error::ExportResult;
use crate::file_handler::{ensure_dir, write_file_atomic};
use std::path::PathBuf;

/// Receives a finished PDF
#[allow(async_fn_in_trait)]
pub trait ArtifactSink {
    /// Store `bytes` under `filename`, returning where it ended up
    async fn deliver(&mut self, filename: &str, bytes: Vec<u8>) -> ExportResult<PathBuf>;
}

/// Writes documents into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    async fn deliver(&mut self, filename: &str, bytes: Vec<u8>) -> ExportResult<PathBuf> {
        let dir = ensure_dir(&self.dir).await?;
        let path = dir.join(filename);
        write_file_atomic(&path, &bytes).await?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
