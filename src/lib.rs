//! # negapost
//!
//! Turns a scanned photographic negative into a positive print. A decoded
//! RGBA buffer and a snapshot of the adjustment controls go in; a transformed
//! buffer comes out.
//!
//! # Architecture: Load, Render, Export
//!
//! ```text
//! 1. Load     file       →  PixelBuffer   (validated, decoded once)
//! 2. Render   original   →  rendered      (every control change, from the original)
//! 3. Export   rendered   →  file          (format from extension)
//! ```
//!
//! The original buffer is never written to. Each render starts from it with a
//! fresh [`params::ParameterSet`], so adjustments never stack on top of each
//! other and the same controls always produce the same pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The per-pixel transform: invert, mask, channels, exposure, contrast, mode, clamp |
//! | [`params`] | `ParameterSet` snapshot and the `Mode` selector |
//! | [`controls`] | Raw text state of the adjustment controls |
//! | [`buffer`] | `PixelBuffer`, a checked RGBA8 raster |
//! | [`loader`] | File type, size and dimension checks, then decode |
//! | [`session`] | Owns original + render, re-renders on change, exports; last-write-wins |
//! | [`tune`] | Line-driven control loop behind `negapost tune` |
//! | [`config`] | `negapost.toml` loading, validation and merging |
//! | [`imaging`] | Pure-Rust decode / identify / encode behind the `ImageBackend` trait |
//! | [`output`] | CLI output formatting and user-facing load notices |
//!
//! # Design Decisions
//!
//! ## One Clamp, At The End
//!
//! Intermediate channel values are `f32` and may leave `[0, 255]` freely: a
//! blue channel divided by the orange-mask factor can reach well over 1000
//! before exposure or contrast pull it back. Values are clamped and rounded
//! exactly once, after the last stage.
//!
//! ## Pure-Rust Imaging
//!
//! [`imaging`] uses the `image` crate for every format. No system libraries,
//! no external tools.

pub mod buffer;
pub mod config;
pub mod controls;
pub mod engine;
pub mod imaging;
pub mod loader;
pub mod output;
pub mod params;
pub mod session;
pub mod tune;

#[cfg(test)]
pub(crate) mod test_helpers;
