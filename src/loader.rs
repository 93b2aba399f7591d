//! Validated loading of a negative from disk.
//!
//! Checks run cheapest first and stop at the first failure:
//!
//! ```text
//! extension ──→ file size ──→ header dimensions ──→ full decode
//! InvalidFileType  FileTooLarge  DimensionsTooLarge   DecodeFailure
//! ```
//!
//! Dimensions come from the header, so an oversized image is rejected
//! before any pixel memory is allocated. Nothing is returned unless every
//! check passes; a failed load never yields a partial image.

use crate::buffer::PixelBuffer;
use crate::config::LimitsConfig;
use crate::imaging::{BackendError, Dimensions, ImageBackend};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{} is not a supported image file", path.display())]
    InvalidFileType { path: PathBuf },
    #[error("{} is {size} bytes, over the {limit}-byte limit", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error(
        "{} is {width}x{height} pixels, over the {limit}x{limit} limit",
        path.display()
    )]
    DimensionsTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        limit: u32,
    },
    #[error("failed to load {}: {source}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidFileType { path }
            | Self::FileTooLarge { path, .. }
            | Self::DimensionsTooLarge { path, .. }
            | Self::DecodeFailure { path, .. } => path,
        }
    }
}

/// What the validation pass learned about a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub dimensions: Dimensions,
}

/// A negative that passed every check, decoded and ready to render.
#[derive(Debug, Clone)]
pub struct LoadedNegative {
    pub info: SourceInfo,
    pub pixels: PixelBuffer,
}

/// Run every check except the full decode.
pub fn inspect(
    path: &Path,
    limits: &LimitsConfig,
    backend: &dyn ImageBackend,
) -> Result<SourceInfo, LoadError> {
    let decode_failure = |source: BackendError| LoadError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    };

    if !backend.can_decode(path) {
        return Err(LoadError::InvalidFileType {
            path: path.to_path_buf(),
        });
    }

    let file_size = std::fs::metadata(path)
        .map_err(|e| decode_failure(e.into()))?
        .len();
    if file_size > limits.max_file_bytes {
        return Err(LoadError::FileTooLarge {
            path: path.to_path_buf(),
            size: file_size,
            limit: limits.max_file_bytes,
        });
    }

    let dimensions = backend.identify(path).map_err(decode_failure)?;
    if dimensions.width > limits.max_dimension || dimensions.height > limits.max_dimension {
        return Err(LoadError::DimensionsTooLarge {
            path: path.to_path_buf(),
            width: dimensions.width,
            height: dimensions.height,
            limit: limits.max_dimension,
        });
    }

    debug!(path = %path.display(), file_size, "source passed validation");
    Ok(SourceInfo {
        path: path.to_path_buf(),
        file_size,
        dimensions,
    })
}

/// Validate and decode a negative.
pub fn load_negative(
    path: &Path,
    limits: &LimitsConfig,
    backend: &dyn ImageBackend,
) -> Result<LoadedNegative, LoadError> {
    let info = inspect(path, limits, backend)?;
    let pixels = backend
        .decode(path)
        .map_err(|source| LoadError::DecodeFailure {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        "image loaded: {} ({}x{})",
        path.display(),
        pixels.width(),
        pixels.height()
    );
    Ok(LoadedNegative { info, pixels })
}
