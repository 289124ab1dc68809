//! Application orchestration for turning user images into 64×64 icons.

use crate::export::{unique_entry_names, Artifact, DirectorySink, DownloadSink, Exporter};
use crate::gallery::Gallery;
use crate::ingest::{self, InputFile};
use crate::models::{Config, Preview, ProcessedImage};
use crate::thumbnail::{ThumbnailProcessor, ThumbnailService};
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// An input that produced no thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedInput {
    pub name: String,
    pub reason: String,
}

/// Outcome of one batch of inputs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub added: Vec<Preview>,
    /// Files that were not images.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedInput>,
}

/// Owns the gallery and drives ingestion, thumbnailing and export.
pub struct App {
    thumbnails: Arc<dyn ThumbnailService>,
    exporter: Exporter,
    gallery: Gallery,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub thumbnails: Arc<dyn ThumbnailService>,
    pub sink: Box<dyn DownloadSink>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            thumbnails: services.thumbnails,
            exporter: Exporter::new(services.sink),
            gallery: Gallery::new(),
        }
    }

    /// Build an app that resizes with the `image` crate and writes into
    /// `config.output_dir`.
    pub fn new(config: Config) -> Self {
        info!("Artifacts will be written to {}", config.output_dir.display());
        let sink = Box::new(DirectorySink::new(&config.output_dir));
        Self::with_services(AppServices {
            thumbnails: Arc::new(ThumbnailProcessor::new()),
            sink,
        })
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Read, filter and process files from disk.
    pub async fn add_files(&mut self, paths: &[PathBuf]) -> BatchReport {
        let (files, read_failures) = ingest::read_inputs(paths).await;
        let mut report = self.add_inputs(files).await;

        report.failed.extend(read_failures.into_iter().map(|f| FailedInput {
            name: f.path.display().to_string(),
            reason: f.reason,
        }));
        report
    }

    /// Process already-loaded files.
    ///
    /// Every image is processed concurrently; finished thumbnails are appended
    /// in input order no matter which finishes first.
    pub async fn add_inputs(&mut self, files: Vec<InputFile>) -> BatchReport {
        let (images, skipped) = ingest::filter_images(files);
        info!(
            "Processing {} image(s), {} non-image file(s) skipped",
            images.len(),
            skipped.len()
        );

        let names: Vec<String> = images.iter().map(|f| f.name.clone()).collect();
        let mut tasks = JoinSet::new();
        for (index, file) in images.into_iter().enumerate() {
            let service = Arc::clone(&self.thumbnails);
            tasks.spawn(async move { (index, service.process(&file).await) });
        }

        // Completion buffer indexed by submission order.
        let mut slots: Vec<Option<Result<ProcessedImage>>> = names.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Thumbnail task failed to complete: {}", e),
            }
        }

        let mut report = BatchReport {
            skipped,
            ..Default::default()
        };
        for (name, slot) in names.into_iter().zip(slots) {
            let outcome = slot
                .unwrap_or_else(|| Err(Error::Invariant("thumbnail task aborted".to_string())))
                .and_then(|record| record.preview().map(|preview| (record, preview)));

            match outcome {
                Ok((record, preview)) => {
                    self.gallery.append(record);
                    report.added.push(preview);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", name, e);
                    report.failed.push(FailedInput {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Gallery now holds {} thumbnail(s) ({} added, {} failed)",
            self.gallery.len(),
            report.added.len(),
            report.failed.len()
        );
        report
    }

    pub fn remove(&mut self, image: &ProcessedImage) -> bool {
        let removed = self.gallery.remove(image);
        if removed {
            info!("Removed {}", image.name);
        }
        removed
    }

    /// Remove the first thumbnail with this output name.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        match self.gallery.find_by_name(name).cloned() {
            Some(image) => self.remove(&image),
            None => {
                warn!("No thumbnail named {}", name);
                false
            }
        }
    }

    pub fn clear(&mut self) {
        info!("Clearing {} thumbnail(s)", self.gallery.len());
        self.gallery.clear();
    }

    pub fn previews(&self) -> Result<Vec<Preview>> {
        self.gallery.iter().map(ProcessedImage::preview).collect()
    }

    /// Export a single thumbnail under its own name.
    pub async fn download(&self, image: &ProcessedImage) -> Result<Artifact> {
        self.exporter.export_one(image).await
    }

    /// Export every thumbnail one file at a time.
    ///
    /// Repeated names are numbered the same way as archive entries so no
    /// file overwrites another.
    pub async fn download_each(&self) -> Result<Vec<Artifact>> {
        let snapshot = self.gallery.snapshot();
        let names = unique_entry_names(&snapshot);

        let mut artifacts = Vec::with_capacity(snapshot.len());
        for (image, name) in snapshot.iter().zip(names) {
            artifacts.push(self.exporter.export_one_as(image, &name).await?);
        }
        Ok(artifacts)
    }

    /// Export the whole gallery: nothing, one JPEG, or the zip archive.
    pub async fn download_all(&self) -> Result<Option<Artifact>> {
        let snapshot = self.gallery.snapshot();
        self.exporter.export(&snapshot).await.map_err(|e| {
            error!("Export of {} thumbnail(s) failed: {}", snapshot.len(), e);
            e
        })
    }
}
