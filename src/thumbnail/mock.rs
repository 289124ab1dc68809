use super::ThumbnailService;
use crate::ingest::InputFile;
use crate::models::ProcessedImage;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct MockThumbnailProcessor {
    process_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    failing_names: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockThumbnailProcessor {
    pub fn new() -> Self {
        Self {
            process_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            failing_names: Arc::new(Mutex::new(Vec::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Fail only for inputs with this file name.
    pub fn with_failure_for(self, name: &str) -> Self {
        self.failing_names.lock().unwrap().push(name.to_string());
        self
    }

    /// Hold back the result for this file name, to shuffle completion order.
    pub fn with_delay_for(self, name: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(name.to_string(), delay);
        self
    }

    pub fn get_process_count(&self) -> usize {
        *self.process_count.lock().unwrap()
    }

    /// Bytes the mock stores for a given source file name.
    pub fn fake_jpeg(source_name: &str) -> Vec<u8> {
        format!("mock-jpeg:{}", source_name).into_bytes()
    }
}

impl Default for MockThumbnailProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ThumbnailService for MockThumbnailProcessor {
    async fn process(&self, file: &InputFile) -> Result<ProcessedImage> {
        let delay = self.delays.lock().unwrap().get(&file.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fail = *self.should_fail.lock().unwrap()
            || self.failing_names.lock().unwrap().contains(&file.name);
        if fail {
            return Err(crate::Error::Image(image::ImageError::IoError(
                std::io::Error::other("Mock failure"),
            )));
        }

        *self.process_count.lock().unwrap() += 1;

        Ok(ProcessedImage::from_jpeg(
            &file.name,
            file.size,
            &Self::fake_jpeg(&file.name),
        ))
    }
}
