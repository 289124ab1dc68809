use super::DownloadSink;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockDownloadSink {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    content_types: Arc<Mutex<HashMap<String, String>>>,
    base_path: String,
    delivery_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockDownloadSink {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            content_types: Arc::new(Mutex::new(HashMap::new())),
            base_path: "/downloads".to_string(),
            delivery_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_base_path(mut self, path: String) -> Self {
        self.base_path = path;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_delivery_count(&self) -> usize {
        *self.delivery_count.lock().unwrap()
    }

    pub fn get_file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn get_content_type(&self, name: &str) -> Option<String> {
        self.content_types.lock().unwrap().get(name).cloned()
    }

    pub fn get_files(&self) -> HashMap<String, Vec<u8>> {
        self.files.lock().unwrap().clone()
    }
}

impl Default for MockDownloadSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadSink for MockDownloadSink {
    async fn deliver(&self, name: &str, data: &[u8], content_type: &str) -> Result<PathBuf> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Io(std::io::Error::other("Mock failure")));
        }

        *self.delivery_count.lock().unwrap() += 1;

        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        self.content_types
            .lock()
            .unwrap()
            .insert(name.to_string(), content_type.to_string());

        Ok(PathBuf::from(format!("{}/{}", self.base_path, name)))
    }
}
