// End-to-end runs of the batch driver against a scratch directory.
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use normalize_images::batch::{BatchRunner, CatalogOutcome};
use normalize_images::settings::{BatchSettings, DEFAULT_CATALOG_FILE, PipelineMode};

const TIMESTAMP: i64 = 1_700_000_000;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock error")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("normalize-images-e2e-{tag}-{nanos}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_image(path: &Path, image: DynamicImage, format: ImageFormat) {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).expect("encode test image");
    fs::write(path, cursor.into_inner()).expect("write test image");
}

fn read_output(path: &Path) -> DynamicImage {
    let bytes = fs::read(path).expect("read output");
    assert_eq!(image::guess_format(&bytes).expect("guess format"), ImageFormat::Jpeg);
    image::load_from_memory(&bytes).expect("decode output")
}

#[test]
fn catalog_mode_renames_images_and_patches_csv() {
    let dir = unique_temp_dir("catalog");

    write_image(
        &dir.join("a.jpg"),
        DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 60, Rgb([200, 30, 30]))),
        ImageFormat::Jpeg,
    );
    write_image(
        &dir.join("b.PNG"),
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 50, Rgba([0, 0, 255, 128]))),
        ImageFormat::Png,
    );

    let csv = "Part,Name,BrickLink URL\n\
               3001,Brick,https://cdn.example.com/images_giant_booster/a.jpg\n\
               3002,Plate,https://cdn.example.com/images_giant_booster/b.PNG\n\
               3003,Tile,https://cdn.example.com/images_giant_booster/c.jpg\n";
    fs::write(dir.join(DEFAULT_CATALOG_FILE), csv).expect("write csv");

    let runner = BatchRunner::new(BatchSettings::for_mode(PipelineMode::Catalog)).expect("runner");
    let summary = runner.run_at(&dir, TIMESTAMP).expect("batch run");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 2);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.mapping.get("a.jpg").map(String::as_str), Some("a_1700000000.jpg"));
    assert_eq!(summary.mapping.get("b.PNG").map(String::as_str), Some("b_1700000000.PNG"));

    assert!(!dir.join("a.jpg").exists());
    assert!(!dir.join("b.PNG").exists());
    for name in ["a_1700000000.jpg", "b_1700000000.PNG"] {
        let output = read_output(&dir.join(name));
        assert_eq!(output.dimensions(), (256, 256));
        assert_eq!(output.color(), ColorType::Rgb8);
    }

    let CatalogOutcome::Patched(report) = &summary.catalog else {
        panic!("catalog should be patched, got {:?}", summary.catalog);
    };
    assert_eq!(report.updated_rows, 2);

    let patched = fs::read_to_string(dir.join(DEFAULT_CATALOG_FILE)).expect("read csv");
    assert!(patched.contains("images_giant_booster/a_1700000000.jpg"));
    assert!(patched.contains("images_giant_booster/b_1700000000.PNG"));
    assert!(patched.contains("images_giant_booster/c.jpg"));

    let backup = fs::read_to_string(dir.join("lego_parts2_backup.csv")).expect("read backup");
    assert_eq!(backup, csv);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn square_mode_overwrites_in_place_and_keeps_backup() {
    let dir = unique_temp_dir("square");
    let source = dir.join("photo.png");
    write_image(
        &source,
        DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 120, Rgb([10, 120, 10]))),
        ImageFormat::Png,
    );
    let original_bytes = fs::read(&source).expect("read original");

    let mut settings = BatchSettings::for_mode(PipelineMode::Square);
    settings.create_backup = true;
    settings.normalize.final_size = 64;

    let runner = BatchRunner::new(settings).expect("runner");
    let summary = runner.run_at(&dir, TIMESTAMP).expect("batch run");

    assert_eq!(summary.succeeded, 1);
    assert!(summary.mapping.is_empty());
    assert_eq!(summary.catalog, CatalogOutcome::Skipped);

    let output = read_output(&source);
    assert_eq!(output.dimensions(), (64, 64));

    let backup = dir.join("backup_original").join("photo.png");
    assert_eq!(fs::read(backup).expect("read backup"), original_bytes);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn failed_file_does_not_stop_batch_or_enter_mapping() {
    let dir = unique_temp_dir("partial");
    fs::write(dir.join("a_broken.jpg"), b"definitely not a jpeg").expect("write broken");
    write_image(
        &dir.join("b_good.png"),
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]))),
        ImageFormat::Png,
    );
    fs::write(
        dir.join(DEFAULT_CATALOG_FILE),
        "id,url\n1,/images_giant_booster/a_broken.jpg\n2,/images_giant_booster/b_good.png\n",
    )
    .expect("write csv");

    let runner = BatchRunner::new(BatchSettings::for_mode(PipelineMode::Catalog)).expect("runner");
    let summary = runner.run_at(&dir, TIMESTAMP).expect("batch run");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].file_name, "a_broken.jpg");
    assert!(dir.join("a_broken.jpg").exists());
    assert!(!summary.mapping.contains_key("a_broken.jpg"));

    let patched = fs::read_to_string(dir.join(DEFAULT_CATALOG_FILE)).expect("read csv");
    assert!(patched.contains("/images_giant_booster/a_broken.jpg"));
    assert!(patched.contains("/images_giant_booster/b_good_1700000000.png"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn catalog_without_url_column_keeps_renamed_images() {
    let dir = unique_temp_dir("nocolumn");
    write_image(
        &dir.join("a.png"),
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]))),
        ImageFormat::Png,
    );
    let csv = "id,name\n1,brick\n";
    fs::write(dir.join(DEFAULT_CATALOG_FILE), csv).expect("write csv");

    let runner = BatchRunner::new(BatchSettings::for_mode(PipelineMode::Catalog)).expect("runner");
    let summary = runner.run_at(&dir, TIMESTAMP).expect("batch run");

    assert!(matches!(summary.catalog, CatalogOutcome::Failed(_)));
    assert!(dir.join("a_1700000000.png").exists());
    assert_eq!(fs::read_to_string(dir.join(DEFAULT_CATALOG_FILE)).expect("read csv"), csv);

    let _ = fs::remove_dir_all(dir);
}
