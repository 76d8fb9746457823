//! Temporary on-disk staging for uploads.

use alttext_error::{TransportError, TransportErrorKind};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// A payload written to a temporary file for the duration of one upload.
///
/// The file is removed when the guard is dropped, so every exit path of the
/// upload (success, rejection, timeout, cancellation) cleans up.
#[derive(Debug)]
pub(crate) struct StagedPayload {
    file: NamedTempFile,
    size: u64,
}

impl StagedPayload {
    /// Write `data` to a fresh temporary file in `dir` (or the system temp dir).
    pub async fn write(dir: Option<&Path>, data: &[u8]) -> Result<Self, TransportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("alttext-upload-");
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| staging_error("create", e))?;

        let mut writer = tokio::fs::OpenOptions::new()
            .write(true)
            .open(file.path())
            .await
            .map_err(|e| staging_error("open", e))?;
        writer
            .write_all(data)
            .await
            .map_err(|e| staging_error("write", e))?;
        writer.flush().await.map_err(|e| staging_error("flush", e))?;

        tracing::debug!(path = %file.path().display(), size = data.len(), "Staged upload payload");
        Ok(Self {
            file,
            size: data.len() as u64,
        })
    }

    /// Size of the staged payload in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Open the staged file as a streaming request body.
    pub async fn body(&self) -> Result<reqwest::Body, TransportError> {
        let file = tokio::fs::File::open(self.file.path())
            .await
            .map_err(|e| staging_error("reopen", e))?;
        Ok(reqwest::Body::from(file))
    }

    /// Remove the staged file now, logging instead of failing on error.
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
        }
    }
}

fn staging_error(step: &str, e: std::io::Error) -> TransportError {
    TransportError::new(TransportErrorKind::Staging(format!(
        "could not {step} temporary file: {e}"
    )))
}
