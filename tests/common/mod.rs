//! Shared fixtures for integration tests.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Read, Write};
use zip::{ZipArchive, ZipWriter, write::SimpleFileOptions};

pub const INDEX_HTML: &[u8] =
    b"<!DOCTYPE html>\n<html>\n<head>\n<title>Test</title>\n</head>\n<body>Hello</body>\n</html>\n";
pub const STYLE_CSS: &[u8] = b"body { color: red; }\n";

/// Build an in-memory ZIP from `(name, bytes)` pairs.
pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// The two-file site used across tests.
pub fn sample_site() -> Vec<u8> {
    zip_of(&[("index.html", INDEX_HTML), ("style.css", STYLE_CSS)])
}

/// Solid square PNG.
pub fn png(size: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(size, size, Rgba([30, 120, 220, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Entry names of a ZIP in archive order.
pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Contents of one entry.
pub fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}
