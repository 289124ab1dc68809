//! Data models and structures
//!
//! Defines the processed-thumbnail record, the preview summary shown to the
//! user, naming helpers and runtime configuration.

use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Edge length of every generated thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 64;

/// JPEG quality used for every thumbnail (maximum).
pub const JPEG_QUALITY: u8 = 100;

/// Appended to the source basename to build a thumbnail's file name.
pub const THUMBNAIL_SUFFIX: &str = "_64x64.jpg";

/// Fixed file name of the bulk export.
pub const ARCHIVE_NAME: &str = "teamspeak_icons_64x64.zip";

pub const JPEG_MIME: &str = "image/jpeg";
pub const ZIP_MIME: &str = "application/zip";

/// One finished thumbnail held in the gallery.
///
/// The encoded JPEG lives in memory as a `data:` URL, the same textual form
/// the preview consumes; [`ProcessedImage::encoded_bytes`] recovers the raw
/// bytes for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedImage {
    pub id: Uuid,
    pub name: String,
    pub source_name: String,
    pub source_size: u64,
    pub data_url: String,
}

impl ProcessedImage {
    /// Build a record from freshly encoded JPEG bytes.
    pub fn from_jpeg(source_name: &str, source_size: u64, jpeg: &[u8]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: thumbnail_name(source_name),
            source_name: source_name.to_string(),
            source_size,
            data_url: to_data_url(JPEG_MIME, jpeg),
        }
    }

    /// Base64 payload of the data URL.
    pub fn payload(&self) -> Result<&str> {
        data_url_payload(&self.data_url)
    }

    /// Decode the textual encoding back into the raw JPEG bytes.
    pub fn encoded_bytes(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(self.payload()?)?)
    }

    /// Encoded size estimated from the base64 length (`round(len * 3 / 4)`).
    pub fn encoded_size(&self) -> Result<u64> {
        let len = self.payload()?.len() as u64;
        Ok((len * 3 + 2) / 4)
    }

    pub fn preview(&self) -> Result<Preview> {
        Ok(Preview {
            name: self.name.clone(),
            source_name: self.source_name.clone(),
            original_size: format_file_size(self.source_size),
            resized_size: format_file_size(self.encoded_size()?),
        })
    }
}

/// What the user sees for each processed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub name: String,
    pub source_name: String,
    pub original_size: String,
    pub resized_size: String,
}

impl std::fmt::Display for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} (original: {}, resized: {})",
            self.source_name, self.name, self.original_size, self.resized_size
        )
    }
}

/// Derive the thumbnail file name: drop the last extension, append `_64x64.jpg`.
///
/// Only a dot followed by at least one character, none of them `/`, counts
/// as an extension, so `"name."` keeps its trailing dot and `"dir.v2/photo"`
/// is left whole.
pub fn thumbnail_name(source_name: &str) -> String {
    let stem = match source_name.rfind('.') {
        Some(pos) if pos + 1 < source_name.len() && !source_name[pos..].contains('/') => {
            &source_name[..pos]
        }
        _ => source_name,
    };
    format!("{}{}", stem, THUMBNAIL_SUFFIX)
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Split a `data:<mime>;base64,<payload>` URL and return the payload.
pub fn data_url_payload(data_url: &str) -> Result<&str> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUrl("missing ',' separator".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(Error::InvalidDataUrl(format!(
            "unsupported header '{}'",
            header
        )));
    }
    Ok(payload)
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read `ICON64_OUTPUT_DIR`.
    ///
    /// A missing `.env` is fine; one that exists but cannot be parsed is an error.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            output_dir: std::env::var("ICON64_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Config::default().output_dir),
        })
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }
}
