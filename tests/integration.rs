use icon64::{
    app::{App, AppServices},
    export::{build_archive, DownloadSink, MockDownloadSink},
    gallery::Gallery,
    ingest::InputFile,
    models::{Config, ProcessedImage, ARCHIVE_NAME},
    thumbnail::{MockThumbnailProcessor, ThumbnailProcessor, ThumbnailService},
};
use image::{GenericImageView, ImageFormat};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let path = dir.join(name);
    img.save_with_format(&path, format).unwrap();
    path
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}

#[tokio::test]
async fn test_full_workflow_writes_archive_to_disk() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let paths = vec![
        write_image(input.path(), "banner.png", 400, 100, ImageFormat::Png),
        write_image(input.path(), "photo.jpg", 90, 160, ImageFormat::Jpeg),
        write_image(input.path(), "sprite.bmp", 16, 16, ImageFormat::Bmp),
    ];
    let notes = input.path().join("notes.txt");
    fs::write(&notes, "not an image").unwrap();

    let mut all_paths = paths.clone();
    all_paths.push(notes);

    let mut app = App::new(Config::default().with_output_dir(output.path().to_path_buf()));
    let report = app.add_files(&all_paths).await;

    assert_eq!(report.added.len(), 3);
    assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
    assert!(report.failed.is_empty());

    let artifact = app.download_all().await.unwrap().unwrap();
    assert_eq!(artifact.name, ARCHIVE_NAME);
    assert_eq!(artifact.path, output.path().join(ARCHIVE_NAME));

    let entries = zip_entries(&fs::read(&artifact.path).unwrap());
    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["banner_64x64.jpg", "photo_64x64.jpg", "sprite_64x64.jpg"]
    );

    for ((_, data), record) in entries.iter().zip(app.gallery().iter()) {
        assert_eq!(data, &record.encoded_bytes().unwrap());
        let decoded = image::load_from_memory(data).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
    }
}

#[tokio::test]
async fn test_single_image_is_written_directly() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_image(input.path(), "avatar.webp.png", 128, 128, ImageFormat::Png);

    let mut app = App::new(Config::default().with_output_dir(output.path().to_path_buf()));
    app.add_files(&[path]).await;

    let artifact = app.download_all().await.unwrap().unwrap();
    assert_eq!(artifact.name, "avatar.webp_64x64.jpg");
    assert!(!output.path().join(ARCHIVE_NAME).exists());

    let written = fs::read(&artifact.path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    assert_eq!(
        image::load_from_memory(&written).unwrap().dimensions(),
        (64, 64)
    );
}

#[tokio::test]
async fn test_empty_gallery_writes_nothing() {
    let output = tempfile::tempdir().unwrap();
    let target = output.path().join("icons");

    let mut app = App::new(Config::default().with_output_dir(target.clone()));
    app.add_inputs(vec![InputFile::new("readme.md", b"# hi".to_vec())])
        .await;

    assert!(app.download_all().await.unwrap().is_none());
    assert!(!target.exists());
}

#[tokio::test]
async fn test_corrupt_image_is_reported_not_fatal() {
    let input = tempfile::tempdir().unwrap();
    let good = write_image(input.path(), "good.png", 32, 32, ImageFormat::Png);
    let bad = input.path().join("bad.png");
    fs::write(&bad, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]).unwrap();
    let missing = input.path().join("missing.png");

    let sink = MockDownloadSink::new();
    let mut app = App::with_services(AppServices {
        thumbnails: Arc::new(ThumbnailProcessor::new()),
        sink: Box::new(sink.clone()),
    });

    let report = app.add_files(&[good, bad, missing]).await;

    assert_eq!(report.added.len(), 1);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].name, "bad.png");
    assert!(report.failed[1].name.ends_with("missing.png"));

    let artifact = app.download_all().await.unwrap().unwrap();
    assert_eq!(artifact.name, "good_64x64.jpg");
    assert_eq!(sink.get_delivery_count(), 1);
}

#[tokio::test]
async fn test_cleared_gallery_exports_nothing() {
    let sink = MockDownloadSink::new();
    let mut app = App::with_services(AppServices {
        thumbnails: Arc::new(MockThumbnailProcessor::new()),
        sink: Box::new(sink.clone()),
    });

    app.add_inputs(vec![
        InputFile::new("a.png", vec![0x89, 0x50, 0x4E, 0x47]),
        InputFile::new("b.png", vec![0x89, 0x50, 0x4E, 0x47]),
    ])
    .await;
    app.clear();

    assert!(app.download_all().await.unwrap().is_none());
    assert_eq!(sink.get_delivery_count(), 0);
}

#[tokio::test]
async fn test_archive_after_removal_matches_gallery() {
    let sink = MockDownloadSink::new();
    let mut app = App::with_services(AppServices {
        thumbnails: Arc::new(MockThumbnailProcessor::new()),
        sink: Box::new(sink.clone()),
    });
    let files = ["one.png", "two.gif", "three.jpg"]
        .iter()
        .map(|name| InputFile::new(*name, vec![0x89, 0x50, 0x4E, 0x47]))
        .collect();
    app.add_inputs(files).await;
    assert!(app.remove_by_name("two_64x64.jpg"));

    app.download_all().await.unwrap();

    let entries = zip_entries(&sink.get_file(ARCHIVE_NAME).unwrap());
    assert_eq!(
        entries,
        vec![
            (
                "one_64x64.jpg".to_string(),
                MockThumbnailProcessor::fake_jpeg("one.png")
            ),
            (
                "three_64x64.jpg".to_string(),
                MockThumbnailProcessor::fake_jpeg("three.jpg")
            ),
        ]
    );
}

#[tokio::test]
async fn test_processor_and_archive_compose_without_app() {
    let processor = ThumbnailProcessor::new();
    let mut gallery = Gallery::new();

    for (name, size) in [("a.png", (5, 50)), ("b.png", (70, 3))] {
        let mut bytes = Vec::new();
        image::RgbImage::new(size.0, size.1)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        gallery.append(processor.process(&InputFile::new(name, bytes)).await.unwrap());
    }

    let archive = build_archive(gallery.as_slice()).unwrap();
    let entries = zip_entries(&archive);
    assert_eq!(entries.len(), gallery.len());

    let first: &ProcessedImage = gallery.get(0).unwrap();
    assert_eq!(entries[0].0, first.name);
    assert_eq!(entries[0].1, first.encoded_bytes().unwrap());
}

#[tokio::test]
async fn test_mock_sink_is_usable_as_trait_object() {
    let sink: Box<dyn DownloadSink> = Box::new(MockDownloadSink::new());
    let path = sink.deliver("x_64x64.jpg", b"x", "image/jpeg").await.unwrap();
    assert!(path.ends_with("x_64x64.jpg"));
}
