use super::ThumbnailService;
use crate::ingest::InputFile;
use crate::models::{ProcessedImage, JPEG_QUALITY, THUMBNAIL_SIZE};
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

#[derive(Debug, Default, Clone, Copy)]
pub struct ThumbnailProcessor;

impl ThumbnailProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Decode, stretch to 64×64 ignoring aspect ratio, encode as JPEG.
    pub fn render_sync(data: &[u8]) -> Result<Vec<u8>> {
        let image = image::load_from_memory(data)?;
        let resized = image.resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle);
        let raster = flatten_onto_black(&resized);

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&raster)?;
        Ok(jpeg)
    }

    async fn render(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        tokio::task::spawn_blocking(move || Self::render_sync(&data))
            .await
            .map_err(|e| Error::Invariant(format!("Thumbnail task join error: {}", e)))?
    }
}

// JPEG has no alpha channel; transparent pixels come out black.
fn flatten_onto_black(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

#[async_trait]
impl ThumbnailService for ThumbnailProcessor {
    async fn process(&self, file: &InputFile) -> Result<ProcessedImage> {
        tracing::debug!("Resizing {} ({} bytes)", file.name, file.size);

        let jpeg = self.render(file.data.clone()).await?;
        let record = ProcessedImage::from_jpeg(&file.name, file.size, &jpeg);

        tracing::debug!("Encoded {} ({} bytes)", record.name, jpeg.len());
        Ok(record)
    }
}
