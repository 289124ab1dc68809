//! Export of processed thumbnails
//!
//! A single thumbnail is delivered as-is; two or more are bundled into one
//! zip archive with a fixed name. Delivery goes through a [`DownloadSink`]
//! so the destination can be swapped out in tests.

pub mod mock;
pub mod sink;

pub use mock::MockDownloadSink;
pub use sink::DirectorySink;

use crate::models::{ProcessedImage, ARCHIVE_NAME, JPEG_MIME, ZIP_MIME};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Hand one finished artifact to the user; returns where it ended up.
    async fn deliver(&self, name: &str, data: &[u8], content_type: &str) -> Result<PathBuf>;
}

/// A delivered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub entries: usize,
}

pub struct Exporter {
    sink: Box<dyn DownloadSink>,
}

impl Exporter {
    pub fn new(sink: Box<dyn DownloadSink>) -> Self {
        Self { sink }
    }

    /// Export a snapshot of the gallery: nothing, one file, or one archive.
    pub async fn export(&self, images: &[ProcessedImage]) -> Result<Option<Artifact>> {
        match images {
            [] => {
                info!("Gallery is empty, nothing to export");
                Ok(None)
            }
            [single] => self.export_one(single).await.map(Some),
            _ => {
                let snapshot = images.to_vec();
                let archive = tokio::task::spawn_blocking(move || build_archive(&snapshot))
                    .await
                    .map_err(|e| Error::Invariant(format!("Archive task join error: {}", e)))??;

                let path = self.sink.deliver(ARCHIVE_NAME, &archive, ZIP_MIME).await?;
                info!(
                    "Exported {} thumbnails as {} ({} bytes)",
                    images.len(),
                    ARCHIVE_NAME,
                    archive.len()
                );

                Ok(Some(Artifact {
                    name: ARCHIVE_NAME.to_string(),
                    path,
                    size: archive.len() as u64,
                    entries: images.len(),
                }))
            }
        }
    }

    /// Deliver one thumbnail on its own, under its own name.
    pub async fn export_one(&self, image: &ProcessedImage) -> Result<Artifact> {
        self.export_one_as(image, &image.name).await
    }

    /// Deliver one thumbnail under `name` instead of the record's own name.
    pub async fn export_one_as(&self, image: &ProcessedImage, name: &str) -> Result<Artifact> {
        let bytes = image.encoded_bytes()?;
        let path = self.sink.deliver(name, &bytes, JPEG_MIME).await?;
        info!("Exported {} ({} bytes)", name, bytes.len());

        Ok(Artifact {
            name: name.to_string(),
            path,
            size: bytes.len() as u64,
            entries: 1,
        })
    }
}

/// Serialize thumbnails into a zip archive, one stored entry per record.
///
/// Entry order follows `images`. Repeated names get a ` (n)` counter before
/// the extension so every record keeps its own entry.
pub fn build_archive(images: &[ProcessedImage]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (image, entry_name) in images.iter().zip(unique_entry_names(images)) {
        let bytes = image.encoded_bytes()?;
        writer.start_file(entry_name.as_str(), options)?;
        writer.write_all(&bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Archive entry names for `images`, with collisions numbered.
pub fn unique_entry_names(images: &[ProcessedImage]) -> Vec<String> {
    let mut taken = HashSet::with_capacity(images.len());
    images
        .iter()
        .map(|image| {
            let mut candidate = image.name.clone();
            let mut counter = 2;
            while !taken.insert(candidate.clone()) {
                candidate = numbered_name(&image.name, counter);
                counter += 1;
            }
            candidate
        })
        .collect()
}

fn numbered_name(name: &str, counter: usize) -> String {
    match name.rfind('.') {
        Some(pos) if pos > 0 => format!("{} ({}){}", &name[..pos], counter, &name[pos..]),
        _ => format!("{} ({})", name, counter),
    }
}
