//! Input ingestion
//!
//! Turns user-supplied paths into in-memory files, works out each file's MIME
//! type and keeps only images.

use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A user-supplied file, fully read into memory.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub data: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime = detect_mime(&data, &name).to_string();
        Self {
            name,
            mime,
            size: data.len() as u64,
            data,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, data))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// A path that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Work out a MIME type from the file extension, sniffing magic bytes only
/// when the name has no extension.
pub fn detect_mime(bytes: &[u8], name: &str) -> &'static str {
    match Path::new(name).extension() {
        Some(ext) => mime_from_extension(&ext.to_string_lossy().to_ascii_lowercase()),
        None => sniff_mime(bytes),
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x42, 0x4D, ..] => "image/bmp",
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => "image/tiff",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        _ => "application/octet-stream",
    }
}

fn mime_from_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "txt" | "md" | "csv" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Read every path. Unreadable paths are collected rather than aborting the batch.
pub async fn read_inputs(paths: &[PathBuf]) -> (Vec<InputFile>, Vec<IngestFailure>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        match InputFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                failures.push(IngestFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (files, failures)
}

/// Split files into images (kept, in order) and the names of everything else.
pub fn filter_images(files: Vec<InputFile>) -> (Vec<InputFile>, Vec<String>) {
    let mut images = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();

    for file in files {
        if file.is_image() {
            images.push(file);
        } else {
            debug!("Skipping {} ({}): not an image", file.name, file.mime);
            skipped.push(file.name);
        }
    }

    (images, skipped)
}
