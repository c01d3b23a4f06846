//! Image Storage
//!
//! Writes validated image bytes under a fixed directory inside the public
//! static root. The directory is deploy-time configuration; no request
//! data ever reaches the path except the server-resolved file name.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::ProfileImageError;

/// Fixed upload directory, relative to the static root.
pub const UPLOAD_DIR: &str = "assets/public/images/uploads";

/// The public relative path recorded on the user record (no leading slash).
#[must_use]
pub fn relative_path(file_name: &str) -> String {
    format!("{UPLOAD_DIR}/{file_name}")
}

/// File store rooted at the public static directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at the given static directory.
    #[must_use]
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self {
            root: static_root.into(),
        }
    }

    /// Absolute destination path for a resolved file name.
    #[must_use]
    pub fn destination(&self, file_name: &str) -> PathBuf {
        self.root.join(UPLOAD_DIR).join(file_name)
    }

    /// Write a full byte buffer, overwriting any existing file at the
    /// exact destination path.
    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<(), ProfileImageError> {
        let dest = self.destination(file_name);
        ensure_parent_dir(&dest).await?;
        fs::write(&dest, bytes).await?;
        debug!(path = %dest.display(), size = bytes.len(), "Stored profile image");
        Ok(())
    }

    /// Stream a fetched response body to the destination file.
    ///
    /// `first_chunk` is the chunk that was already pulled for content
    /// sniffing; the remaining chunks are drained from `rest`. I/O
    /// failures surface as `RemoteWriteFailed` so URL-mode callers report
    /// them as a failed upload rather than a server-side storage error.
    pub async fn write_stream<S>(
        &self,
        file_name: &str,
        first_chunk: Bytes,
        mut rest: S,
    ) -> Result<(), ProfileImageError>
    where
        S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
    {
        let dest = self.destination(file_name);
        ensure_parent_dir(&dest)
            .await
            .map_err(ProfileImageError::RemoteWriteFailed)?;

        let mut file = fs::File::create(&dest)
            .await
            .map_err(ProfileImageError::RemoteWriteFailed)?;
        let mut written = first_chunk.len();
        file.write_all(&first_chunk)
            .await
            .map_err(ProfileImageError::RemoteWriteFailed)?;

        while let Some(chunk) = rest.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(ProfileImageError::RemoteWriteFailed)?;
            written += chunk.len();
        }

        file.flush()
            .await
            .map_err(ProfileImageError::RemoteWriteFailed)?;
        debug!(path = %dest.display(), size = written, "Stored profile image from stream");
        Ok(())
    }
}

/// Create the upload directory if it does not exist yet.
async fn ensure_parent_dir(dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
