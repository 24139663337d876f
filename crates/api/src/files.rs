//! Local file store for uploaded meter images.
//!
//! Files land in a single directory served statically at `/files`; the
//! public URL of a stored image is `{base_url}/files/{filename}`.

use std::path::{Path, PathBuf};

/// Saves uploaded images under a directory served at `/files`.
pub struct FileStore {
    root: PathBuf,
    base_url: String,
}

impl FileStore {
    pub fn new(root: PathBuf, base_url: impl Into<String>) -> Self {
        Self {
            root,
            base_url: base_url.into(),
        }
    }

    /// Directory the images are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if it does not exist yet.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Write `bytes` under `filename`, returning the public URL.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::write(self.root.join(filename), bytes).await?;
        Ok(self.public_url(filename))
    }

    /// Best-effort removal of a stored file (used when the row insert that
    /// follows a file write fails).
    pub async fn remove(&self, filename: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(filename)).await {
            tracing::warn!(filename, error = %e, "Failed to remove stored image");
        }
    }

    /// `{base_url}/files/{filename}`.
    pub fn public_url(&self, filename: &str) -> String {
        format!(
            "{}/files/{}",
            self.base_url.trim_end_matches('/'),
            filename
        )
    }
}
