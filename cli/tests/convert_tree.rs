use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use tempfile::TempDir;

use imgconv::batch::Batch;
use imgconv::error::BatchError;
use imgconv::report::FileResult;
use imgconv_core::config::ConvertConfig;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 3) as u8, 90]));
    DynamicImage::ImageRgb8(img)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

fn jpg_to_png() -> ConvertConfig {
    ConvertConfig {
        input_ext: "jpg".into(),
        output_ext: "png".into(),
        ..ConvertConfig::default()
    }
}

fn run(root: &Path, config: ConvertConfig) -> Result<imgconv::report::Report, BatchError> {
    let batch = Batch::new(root, config).unwrap();
    let files = batch.collect()?;
    batch.run(&files, &|_: &FileResult| {})
}

fn assert_png(path: &Path, dims: (u32, u32)) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "{} is not a PNG", path.display());
    let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).unwrap();
    assert_eq!(img.dimensions(), dims);
}

#[test]
fn converts_whole_tree_and_keeps_originals() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_jpeg(&root.join("a.jpg"), 20, 10);
    write_jpeg(&root.join("b.jpg"), 8, 8);
    write_jpeg(&root.join("sub/c.jpg"), 5, 12);
    fs::write(root.join("readme.txt"), b"not an image").unwrap();

    let originals: Vec<(PathBuf, Vec<u8>)> = ["a.jpg", "b.jpg", "sub/c.jpg"]
        .iter()
        .map(|name| (root.join(name), fs::read(root.join(name)).unwrap()))
        .collect();

    let report = run(root, jpg_to_png()).unwrap();

    assert_eq!(report.success_count(), 3);
    assert_eq!(report.error_count(), 0);
    assert_png(&root.join("a.png"), (20, 10));
    assert_png(&root.join("b.png"), (8, 8));
    assert_png(&root.join("sub/c.png"), (5, 12));

    for (path, bytes) in originals {
        assert_eq!(fs::read(&path).unwrap(), bytes, "{} was modified", path.display());
    }
    assert!(!root.join("readme.png").exists());
}

#[test]
fn never_overwrites_existing_outputs() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_jpeg(&root.join("photo.jpg"), 6, 4);
    fs::write(root.join("photo.png"), b"keep me").unwrap();

    let report = run(root, jpg_to_png()).unwrap();

    assert_eq!(report.success_count(), 1);
    assert_eq!(fs::read(root.join("photo.png")).unwrap(), b"keep me");
    assert_png(&root.join("photo (2).png"), (6, 4));
    assert_eq!(report.results[0].output, Some(root.join("photo (2).png")));

    // a second run picks the next free name
    run(root, jpg_to_png()).unwrap();
    assert_png(&root.join("photo (3).png"), (6, 4));
}

#[test]
fn mirrors_tree_into_output_dir() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_jpeg(&src.path().join("top.jpg"), 4, 4);
    write_jpeg(&src.path().join("nested/deep/leaf.jpg"), 3, 2);

    let config = ConvertConfig {
        output_dir: Some(out.path().to_path_buf()),
        ..jpg_to_png()
    };
    run(src.path(), config).unwrap();

    assert_png(&out.path().join("top.png"), (4, 4));
    assert_png(&out.path().join("nested/deep/leaf.png"), (3, 2));
    assert!(!src.path().join("top.png").exists());
}

#[test]
fn parallel_run_converts_every_file() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for i in 0..8 {
        write_jpeg(&root.join(format!("img{i}.jpg")), 4 + i, 4);
    }

    let config = ConvertConfig {
        output_ext: "gif".into(),
        parallel: true,
        ..jpg_to_png()
    };
    let report = run(root, config).unwrap();

    assert_eq!(report.success_count(), 8);
    for i in 0..8 {
        let bytes = fs::read(root.join(format!("img{i}.gif"))).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }
}

#[test]
fn bad_file_is_reported_and_run_continues() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_jpeg(&root.join("good.jpg"), 4, 4);
    fs::write(root.join("bad.jpg"), b"definitely not a jpeg").unwrap();

    let report = run(root, jpg_to_png()).unwrap();

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.error_count(), 1);
    let failed = report.results.iter().find(|r| r.error.is_some()).unwrap();
    assert_eq!(failed.input, root.join("bad.jpg"));
    assert_png(&root.join("good.png"), (4, 4));
}

#[test]
fn fail_fast_stops_on_first_error() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("a.jpg"), b"broken").unwrap();
    write_jpeg(&root.join("b.jpg"), 4, 4);

    let config = ConvertConfig {
        fail_fast: true,
        ..jpg_to_png()
    };
    let err = run(root, config).unwrap_err();

    assert!(matches!(err, BatchError::File { ref path, .. } if path == &root.join("a.jpg")));
    assert!(!root.join("b.png").exists());
}

#[test]
fn dry_run_plan_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_jpeg(&root.join("x.jpg"), 4, 4);
    fs::write(root.join("x.png"), b"existing").unwrap();

    let batch = Batch::new(root, jpg_to_png()).unwrap();
    let files = batch.collect().unwrap();
    let plan = batch.plan(&files).unwrap();

    assert_eq!(plan, vec![(root.join("x.jpg"), root.join("x (2).png"))]);
    assert!(!root.join("x (2).png").exists());
}

#[test]
fn missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let batch = Batch::new(dir.path().join("absent"), jpg_to_png()).unwrap();
    assert!(matches!(batch.collect(), Err(BatchError::MissingRoot(_))));
}
