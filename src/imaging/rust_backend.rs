//! Pure Rust image backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Encode → PNG, TIFF, WebP | `DynamicImage::write_to` (RGBA kept) |
//! | Encode → JPEG | `JpegEncoder`, alpha dropped |

use super::backend::{BackendError, Dimensions, ImageBackend};
use crate::buffer::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

/// JPEG export quality.
const JPEG_QUALITY: u8 = 95;

const CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static INPUT_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

static OUTPUT_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &INPUT_EXTENSIONS
}

/// Image file extensions that have working encoders compiled in.
pub fn supported_output_extensions() -> &'static [&'static str] {
    &OUTPUT_EXTENSIONS
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_supported_input(path: &Path) -> bool {
    extension(path).is_some_and(|ext| supported_input_extensions().contains(&ext.as_str()))
}

/// Resolve the encoder for an output path.
pub fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = extension(path).unwrap_or_default();
    if !supported_output_extensions().contains(&ext.as_str()) {
        return Err(BackendError::UnsupportedFormat(format!(
            "cannot write '.{}' files (supported: {})",
            ext,
            supported_output_extensions().join(", ")
        )));
    }
    ImageFormat::from_extension(&ext)
        .ok_or_else(|| BackendError::UnsupportedFormat(format!("unknown extension '.{ext}'")))
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<File>>, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// `image`-crate backend.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn can_decode(&self, path: &Path) -> bool {
        is_supported_input(path)
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?.into_dimensions().map_err(|e| {
            BackendError::Decode(format!("Failed to read dimensions of {}: {}", path.display(), e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError> {
        let img = open_reader(path)?
            .decode()
            .map_err(|e| BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e)))?;
        Ok(PixelBuffer::from_rgba_image(img.into_rgba8())?)
    }

    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), BackendError> {
        let format = output_format(path)?;
        let img = DynamicImage::ImageRgba8(buffer.to_rgba_image()?);
        let mut writer = BufWriter::new(File::create(path)?);

        let result = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)),
            other => img.write_to(&mut writer, other),
        };
        result.map_err(|e| BackendError::Encode(format!("{}: {}", path.display(), e)))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_test_jpeg, write_test_png};
    use tempfile::TempDir;

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn input_check_is_case_insensitive() {
        assert!(is_supported_input(Path::new("scan.PNG")));
        assert!(is_supported_input(Path::new("dir/scan.Tiff")));
        assert!(!is_supported_input(Path::new("notes.txt")));
        assert!(!is_supported_input(Path::new("no_extension")));
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(output_format(Path::new("a.png")).unwrap(), ImageFormat::Png);
        assert_eq!(output_format(Path::new("a.JPG")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("a.tif")).unwrap(), ImageFormat::Tiff);
        assert!(matches!(
            output_format(Path::new("a.gif")),
            Err(BackendError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn identify_synthetic_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("neg.png");
        write_test_png(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions { width: 200, height: 150 });
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/neg.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_png_keeps_alpha() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("neg.png");
        write_test_png(&path, 4, 3);

        let buffer = RustBackend::new().decode(&path).unwrap();
        assert_eq!(buffer.dimensions(), (4, 3));
        // write_test_png: (x*40, y*60, 128, 200)
        assert_eq!(buffer.pixel(2, 1), Some([80, 60, 128, 200]));
    }

    #[test]
    fn decode_jpeg_is_opaque_rgba() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("neg.jpg");
        write_test_jpeg(&path, 16, 8);

        let buffer = RustBackend::new().decode(&path).unwrap();
        assert_eq!(buffer.dimensions(), (16, 8));
        assert!(buffer.pixels().all(|px| px[3] == 255));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    fn encode_and_reload(tmp: &TempDir, name: &str, buffer: &PixelBuffer) -> PixelBuffer {
        let path = tmp.path().join(name);
        let backend = RustBackend::new();
        backend.encode(buffer, &path).unwrap();
        assert!(path.exists());
        backend.decode(&path).unwrap()
    }

    #[test]
    fn png_export_is_lossless() {
        let tmp = TempDir::new().unwrap();
        let buffer = PixelBuffer::filled(5, 4, [12, 34, 56, 78]).unwrap();
        let reloaded = encode_and_reload(&tmp, "out.png", &buffer);
        assert_eq!(reloaded, buffer);
    }

    #[test]
    fn tiff_export_is_lossless() {
        let tmp = TempDir::new().unwrap();
        let buffer = PixelBuffer::filled(3, 3, [250, 5, 128, 255]).unwrap();
        let reloaded = encode_and_reload(&tmp, "out.tiff", &buffer);
        assert_eq!(reloaded, buffer);
    }

    #[test]
    fn jpeg_export_drops_alpha() {
        let tmp = TempDir::new().unwrap();
        let buffer = PixelBuffer::filled(8, 8, [200, 100, 50, 10]).unwrap();
        let reloaded = encode_and_reload(&tmp, "out.jpg", &buffer);
        assert_eq!(reloaded.dimensions(), (8, 8));
        assert!(reloaded.pixels().all(|px| px[3] == 255));
    }

    #[test]
    fn encode_unsupported_extension_errors() {
        let tmp = TempDir::new().unwrap();
        let buffer = PixelBuffer::filled(1, 1, [0; 4]).unwrap();
        let result = RustBackend::new().encode(&buffer, &tmp.path().join("out.bmp"));
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }
}
