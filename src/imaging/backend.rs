//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the four things the rest of the crate
//! needs from an image library: deciding whether a file is worth opening,
//! reading dimensions from the header, decoding to RGBA8, and encoding a
//! rendered buffer.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use crate::buffer::{BufferError, PixelBuffer};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image backends.
pub trait ImageBackend {
    /// Whether this backend has a decoder for the file's type.
    fn can_decode(&self, path: &Path) -> bool;

    /// Read image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the full image into RGBA8.
    fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError>;

    /// Encode `buffer`, picking the format from the output extension.
    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixel files.
    ///
    /// `decode` hands out the configured buffer; `identify` reports the
    /// configured dimensions (or the buffer's, when none were set).
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: Option<Dimensions>,
        pub buffer: Option<PixelBuffer>,
        pub operations: Mutex<Vec<RecordedOp>>,
        pub encoded: Mutex<Vec<PixelBuffer>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Decode(String),
        Encode { output: String, width: u32, height: u32 },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_buffer(buffer: PixelBuffer) -> Self {
            Self {
                buffer: Some(buffer),
                ..Self::default()
            }
        }

        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                dimensions: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn last_encoded(&self) -> Option<PixelBuffer> {
            self.encoded.lock().unwrap().last().cloned()
        }
    }

    impl ImageBackend for MockBackend {
        fn can_decode(&self, path: &Path) -> bool {
            crate::imaging::rust_backend::is_supported_input(path)
        }

        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.dimensions
                .or_else(|| {
                    self.buffer.as_ref().map(|b| Dimensions {
                        width: b.width(),
                        height: b.height(),
                    })
                })
                .ok_or_else(|| BackendError::Decode("No mock image".to_string()))
        }

        fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(path.to_string_lossy().to_string()));

            self.buffer
                .clone()
                .ok_or_else(|| BackendError::Decode("No mock image".to_string()))
        }

        fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                output: path.to_string_lossy().to_string(),
                width: buffer.width(),
                height: buffer.height(),
            });
            self.encoded.lock().unwrap().push(buffer.clone());
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(800, 600);

        let result = backend.identify(Path::new("/test/neg.png")).unwrap();
        assert_eq!(result, Dimensions { width: 800, height: 600 });

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/neg.png"));
    }

    #[test]
    fn mock_identify_falls_back_to_buffer_dimensions() {
        let buffer = PixelBuffer::filled(3, 2, [0, 0, 0, 255]).unwrap();
        let backend = MockBackend::with_buffer(buffer);
        let dims = backend.identify(Path::new("neg.png")).unwrap();
        assert_eq!(dims, Dimensions { width: 3, height: 2 });
    }

    #[test]
    fn mock_records_encode() {
        let backend = MockBackend::new();
        let buffer = PixelBuffer::filled(4, 2, [1, 2, 3, 4]).unwrap();

        backend.encode(&buffer, Path::new("/out.png")).unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Encode {
                output: "/out.png".to_string(),
                width: 4,
                height: 2
            }]
        );
        assert_eq!(backend.last_encoded(), Some(buffer));
    }

    #[test]
    fn mock_without_image_fails_to_decode() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(Path::new("neg.png")),
            Err(BackendError::Decode(_))
        ));
    }
}
