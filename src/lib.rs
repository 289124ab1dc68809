//! Batch 64×64 icon maker
//!
//! Reads user-supplied images, stretches each one to a 64×64 JPEG thumbnail,
//! keeps the results in an in-memory gallery and exports them either as a
//! single file or as one zip archive.

pub mod app;
pub mod error;
pub mod export;
pub mod gallery;
pub mod ingest;
pub mod models;
pub mod thumbnail;

pub use error::{Error, Result};
