//! Image I/O in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Decode** | `ImageReader::decode` → RGBA8 |
//! | **Encode** | format picked from the output extension |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait, the seam the loader and session use
//! - **Rust backend**: [`RustBackend`], the production implementation

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use rust_backend::{RustBackend, supported_input_extensions, supported_output_extensions};
