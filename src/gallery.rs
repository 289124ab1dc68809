//! In-memory gallery of processed thumbnails
//!
//! An ordered collection owned by the application. Records are only ever
//! added at the end, removed individually or cleared all at once.

use crate::models::ProcessedImage;

#[derive(Debug, Default, Clone)]
pub struct Gallery {
    images: Vec<ProcessedImage>,
}

impl Gallery {
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    pub fn append(&mut self, image: ProcessedImage) {
        self.images.push(image);
    }

    /// Remove the first record equal to `image`. Returns `false` if absent.
    pub fn remove(&mut self, image: &ProcessedImage) -> bool {
        match self.images.iter().position(|i| i == image) {
            Some(index) => {
                self.images.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessedImage> {
        self.images.get(index)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ProcessedImage> {
        self.images.iter().find(|i| i.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessedImage> {
        self.images.iter()
    }

    pub fn as_slice(&self) -> &[ProcessedImage] {
        &self.images
    }

    /// Owned copy of the current contents, detached from later mutation.
    pub fn snapshot(&self) -> Vec<ProcessedImage> {
        self.images.clone()
    }
}

impl<'a> IntoIterator for &'a Gallery {
    type Item = &'a ProcessedImage;
    type IntoIter = std::slice::Iter<'a, ProcessedImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
