//! Shared test utilities: synthetic buffers and image files.

use crate::buffer::PixelBuffer;
use crate::params::{Mode, ParameterSet};
use image::{ImageBuffer, Rgb, Rgba};
use std::path::Path;

/// Build a buffer of `width` columns from a flat list of RGBA pixels.
pub fn buffer_from_pixels(width: u32, pixels: &[[u8; 4]]) -> PixelBuffer {
    let height = pixels.len() as u32 / width;
    let data = pixels.iter().flatten().copied().collect();
    PixelBuffer::new(width, height, data).unwrap()
}

/// Neutral parameters in black-and-white mode.
pub fn neutral_bw() -> ParameterSet {
    ParameterSet {
        mode: Mode::BlackWhite,
        ..ParameterSet::NEUTRAL
    }
}

/// Write arbitrary bytes, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// Write an RGBA PNG where pixel `(x, y)` is `(x*40, y*60, 128, 200)`, wrapping at 256.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 40 % 256) as u8, (y * 60 % 256) as u8, 128, 200])
    });
    img.save(path).unwrap();
}

/// Write an RGB JPEG with a simple gradient.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}
