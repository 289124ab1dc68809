use super::DownloadSink;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes exported artifacts into a directory on disk.
pub struct DirectorySink {
    output_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, name: &str, data: &[u8], content_type: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(name);
        tokio::fs::write(&path, data).await?;
        tracing::debug!(
            "Wrote {} ({}, {} bytes)",
            path.display(),
            content_type,
            data.len()
        );

        Ok(path)
    }
}
