//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! neg.tif
//!     Size: 2.4 MiB (limit 50.0 MiB)
//!     Dimensions: 3000x2000 (limit 10000x10000)
//! Ready to convert
//! ```
//!
//! ## Parameters
//!
//! ```text
//! Parameters
//!     exposure  1.2
//!     contrast  0.1
//!     mask      0
//!     red       1
//!     green     0.95
//!     blue      1
//!     mode      color
//! ```
//!
//! ## Load errors
//!
//! Each [`LoadError`] gets its own one-line notice:
//!
//! ```text
//! Not a supported image: notes.txt (expected jpg, jpeg, png, tif, tiff, webp)
//! File too large: scan.tif is 61.2 MiB, the limit is 50.0 MiB
//! Image too large: scan.tif is 12000x8000 pixels, the limit is 10000x10000
//! Could not read image: broken.png (Decode failed: ...)
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::buffer::PixelBuffer;
use crate::config::LimitsConfig;
use crate::controls::Control;
use crate::imaging::supported_input_extensions;
use crate::loader::{LoadError, SourceInfo};
use crate::params::ParameterSet;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count.
fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}

/// File name for display, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Check
// ============================================================================

/// Format the validation report for a source file.
pub fn format_source_info(info: &SourceInfo, limits: &LimitsConfig) -> Vec<String> {
    vec![
        display_name(&info.path),
        format!(
            "{}Size: {} (limit {})",
            indent(1),
            format_bytes(info.file_size),
            format_bytes(limits.max_file_bytes)
        ),
        format!(
            "{}Dimensions: {}x{} (limit {}x{})",
            indent(1),
            info.dimensions.width,
            info.dimensions.height,
            limits.max_dimension,
            limits.max_dimension
        ),
    ]
}

pub fn print_source_info(info: &SourceInfo, limits: &LimitsConfig) {
    for line in format_source_info(info, limits) {
        println!("{}", line);
    }
}

// ============================================================================
// Parameters
// ============================================================================

fn param_value(params: &ParameterSet, control: Control) -> String {
    match control {
        Control::Exposure => params.exposure.to_string(),
        Control::Contrast => params.contrast.to_string(),
        Control::OrangeMask => params.mask_strength.to_string(),
        Control::ChannelR => params.channel_r.to_string(),
        Control::ChannelG => params.channel_g.to_string(),
        Control::ChannelB => params.channel_b.to_string(),
        Control::Mode => params.mode.label().to_string(),
    }
}

/// Format the effective parameters, one control per line.
pub fn format_params(params: &ParameterSet) -> Vec<String> {
    let mut lines = vec!["Parameters".to_string()];
    for control in Control::ALL {
        lines.push(format!(
            "{}{:<9} {}",
            indent(1),
            control.name(),
            param_value(params, control)
        ));
    }
    lines
}

pub fn print_params(params: &ParameterSet) {
    for line in format_params(params) {
        println!("{}", line);
    }
}

/// One-line acknowledgement of a control change.
///
/// Shows the raw text next to the effective value when they differ, so a
/// value that fell back to neutral is visible.
pub fn format_control_change(control: Control, raw: &str, params: &ParameterSet) -> String {
    let effective = param_value(params, control);
    if raw.trim() == effective {
        format!("{} = {}", control.name(), effective)
    } else {
        format!("{} = {} (from \"{}\")", control.name(), effective, raw)
    }
}

// ============================================================================
// Export
// ============================================================================

pub fn format_export(path: &Path, buffer: &PixelBuffer) -> String {
    format!(
        "Exported {} ({}x{})",
        path.display(),
        buffer.width(),
        buffer.height()
    )
}

// ============================================================================
// Load errors
// ============================================================================

/// User-facing notice for a failed load. Every variant reads differently.
pub fn format_load_error(err: &LoadError) -> String {
    match err {
        LoadError::InvalidFileType { path } => format!(
            "Not a supported image: {} (expected {})",
            display_name(path),
            supported_input_extensions().join(", ")
        ),
        LoadError::FileTooLarge { path, size, limit } => format!(
            "File too large: {} is {}, the limit is {}",
            display_name(path),
            format_bytes(*size),
            format_bytes(*limit)
        ),
        LoadError::DimensionsTooLarge {
            path,
            width,
            height,
            limit,
        } => format!(
            "Image too large: {} is {}x{} pixels, the limit is {}x{}",
            display_name(path),
            width,
            height,
            limit,
            limit
        ),
        LoadError::DecodeFailure { path, source } => format!(
            "Could not read image: {} ({})",
            display_name(path),
            source
        ),
    }
}

// ============================================================================
// Tune
// ============================================================================

pub fn format_tune_help() -> Vec<String> {
    let names: Vec<&str> = Control::ALL.iter().map(|c| c.name()).collect();
    vec![
        "Commands".to_string(),
        format!("{}<control> <value>   set a control ({})", indent(1), names.join(", ")),
        format!("{}show                show current parameters", indent(1)),
        format!("{}reset               return every control to neutral", indent(1)),
        format!("{}export [path]       write the current render", indent(1)),
        format!("{}help                show this list", indent(1)),
        format!("{}quit                leave", indent(1)),
    ]
}

// ============================================================================
// Tests
// ============================================================================
