//! Thumbnail generation
//!
//! Decodes an input image, stretches it to a fixed 64×64 raster and
//! re-encodes it as a maximum-quality JPEG.

pub mod mock;
pub mod processor;

pub use mock::MockThumbnailProcessor;
pub use processor::ThumbnailProcessor;

use crate::ingest::InputFile;
use crate::models::ProcessedImage;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ThumbnailService: Send + Sync {
    async fn process(&self, file: &InputFile) -> Result<ProcessedImage>;
}
