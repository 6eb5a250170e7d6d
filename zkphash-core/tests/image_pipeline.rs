//! Image files to commitment bundle.
//!
//! These tests decode real image files, compute circuit pHashes and check
//! that the hashes behave perceptually under mild transformations.

#![cfg(feature = "image-io")]

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use num_bigint::BigUint;
use tempfile::TempDir;
use zkphash_core::{
    build_database, compute_phash, load_image_grid, CommitBundle, CommitEngine, MockHasher, PHash,
};

/// Maximum acceptable Hamming distance for "similar" images.
const SIMILARITY_THRESHOLD: u32 = 10;

/// A gradient with a coarse checker overlay, rich in low frequencies.
fn create_test_image(width: u32, height: u32) -> RgbImage {
    let mut img = ImageBuffer::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let r = ((x as f32 / width as f32) * 255.0) as u8;
        let g = ((y as f32 / height as f32) * 255.0) as u8;
        let b = (((x + y) as f32 / (width + height) as f32) * 200.0) as u8;
        let pattern = if (x * 4 / width + y * 4 / height) % 2 == 0 { 40 } else { 0 };
        *pixel = Rgb([r.saturating_add(pattern), g, b]);
    }
    img
}

fn write_image(dir: &TempDir, name: &str, img: &RgbImage, format: image::ImageFormat) {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut buffer, format)
        .unwrap();
    std::fs::write(dir.path().join(name), buffer.into_inner()).unwrap();
}

fn distance(a: &PHash, b: &PHash) -> u32 {
    a.pack().hamming_distance(b.pack())
}

#[test]
fn test_resized_copy_stays_similar() {
    let dir = TempDir::new().unwrap();
    let original = create_test_image(256, 256);
    let smaller = image::imageops::resize(
        &original,
        128,
        128,
        image::imageops::FilterType::Triangle,
    );
    write_image(&dir, "original.png", &original, image::ImageFormat::Png);
    write_image(&dir, "smaller.png", &smaller, image::ImageFormat::Png);

    let a = compute_phash(&load_image_grid(&dir.path().join("original.png")).unwrap());
    let b = compute_phash(&load_image_grid(&dir.path().join("smaller.png")).unwrap());
    assert!(
        distance(&a, &b) <= SIMILARITY_THRESHOLD,
        "distance {} too large",
        distance(&a, &b)
    );
}

#[test]
fn test_same_file_in_two_formats_stays_similar() {
    let dir = TempDir::new().unwrap();
    let img = create_test_image(200, 150);
    write_image(&dir, "a.png", &img, image::ImageFormat::Png);
    write_image(&dir, "a.bmp", &img, image::ImageFormat::Bmp);

    let png = compute_phash(&load_image_grid(&dir.path().join("a.png")).unwrap());
    let bmp = compute_phash(&load_image_grid(&dir.path().join("a.bmp")).unwrap());
    assert_eq!(png, bmp);
}

#[test]
fn test_directory_to_bundle() {
    let dir = TempDir::new().unwrap();
    let img = create_test_image(64, 64);
    write_image(&dir, "first.png", &img, image::ImageFormat::Png);
    write_image(
        &dir,
        "second.png",
        &image::imageops::flip_horizontal(&img),
        image::ImageFormat::Png,
    );

    let build = build_database(dir.path(), 8).unwrap();
    assert_eq!(build.processed.len(), 2);
    assert_eq!(build.database.len(), 8);

    let query = load_image_grid(&dir.path().join("first.png")).unwrap();
    assert_eq!(build.database.phashes[0], compute_phash(&query));

    let engine = CommitEngine::new(MockHasher::default());
    let bundle = engine
        .commit(&build.database.phashes, query, BigUint::from(123_456_789u32), 10)
        .unwrap();
    assert_eq!(bundle.file_name(), "8_circom_input.json");

    let restored = CommitBundle::from_json(&bundle.to_json_pretty().unwrap()).unwrap();
    assert_eq!(restored, bundle);
}
