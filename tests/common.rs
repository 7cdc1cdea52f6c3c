#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a real, decodable gradient image.
pub fn create_test_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
        .save_with_format(path, format)
        .unwrap();
}

pub fn create_file(path: &Path, contents: &[u8]) {
    File::create(path).unwrap().write_all(contents).unwrap();
}

/// One file per reduction rule plus an undecodable image.
///
/// Sorted by name: big.jpg, broken.jpg, doc.pdf, notes.txt, small.png
pub fn create_mixed_batch(dir: &Path) -> Vec<PathBuf> {
    let big = dir.join("big.jpg");
    let broken = dir.join("broken.jpg");
    let pdf = dir.join("doc.pdf");
    let notes = dir.join("notes.txt");
    let small = dir.join("small.png");

    create_test_image(&big, 1200, 900, ImageFormat::Jpeg);
    create_file(&broken, b"fake jpg data");
    create_file(&pdf, &[b'%'; 1000]);
    create_file(&notes, &[b'a'; 500]);
    create_test_image(&small, 120, 90, ImageFormat::Png);

    vec![big, broken, pdf, notes, small]
}

pub fn create_nested_directory_structure(temp_dir: &Path) -> PathBuf {
    let subdir = temp_dir.join("subdir");
    std::fs::create_dir(&subdir).unwrap();

    create_file(&subdir.join("nested.txt"), b"nested text");
    create_file(&subdir.join("nested.pdf"), b"%PDF nested");

    subdir
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn create_input_directory(temp_dir: &Path) -> PathBuf {
    let input_dir = temp_dir.join("input");
    std::fs::create_dir(&input_dir).unwrap();
    input_dir
}
