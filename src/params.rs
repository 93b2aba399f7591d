//! The adjustment snapshot handed to the engine for one render.
//!
//! A [`ParameterSet`] is rebuilt from the control state every time a control
//! changes. It never fails to construct: anything missing, unparseable or
//! non-finite collapses to the neutral value of that field, so the engine
//! always sees well-formed numbers.
//!
//! | Field | Neutral | Meaning |
//! |---|---|---|
//! | `exposure` | 1.0 | multiplicative brightness gain |
//! | `contrast` | 0.0 | contrast curve parameter, nominally `[-1, 1]` |
//! | `mask_strength` | 0.0 | orange-mask correction intensity |
//! | `channel_r/g/b` | 1.0 | post-inversion white-balance trim |
//! | `mode` | `Color` | output colorimetry |

use crate::controls::{Control, ControlState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output colorimetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Color negative: orange-mask removal and channel trims apply.
    #[default]
    Color,
    /// Black and white: channels collapse to their plain average.
    #[serde(rename = "bw")]
    BlackWhite,
}

impl Mode {
    /// Parse a mode selector value. Case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Some(Self::Color),
            "bw" | "blackwhite" | "black-white" | "mono" => Some(Self::BlackWhite),
            _ => None,
        }
    }

    /// Short label used in CLI output and config files.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::BlackWhite => "bw",
        }
    }

    pub const fn is_color(self) -> bool {
        matches!(self, Self::Color)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable snapshot of every adjustment control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    /// Multiplicative gain applied to all three channels.
    pub exposure: f32,
    /// Contrast curve parameter. `0.0` is flat, `1.0` is very steep.
    pub contrast: f32,
    /// Orange-mask correction intensity; grows the G and B divisors.
    pub mask_strength: f32,
    pub channel_r: f32,
    pub channel_g: f32,
    pub channel_b: f32,
    pub mode: Mode,
}

impl ParameterSet {
    /// Parameters that leave every optional stage neutral.
    pub const NEUTRAL: Self = Self {
        exposure: 1.0,
        contrast: 0.0,
        mask_strength: 0.0,
        channel_r: 1.0,
        channel_g: 1.0,
        channel_b: 1.0,
        mode: Mode::Color,
    };

    /// Read the current control values into a snapshot.
    pub fn from_controls(controls: &ControlState) -> Self {
        let neutral = Self::NEUTRAL;
        let number = |control: Control, fallback: f32| {
            controls
                .get(control)
                .and_then(coerce_number)
                .unwrap_or(fallback)
        };

        Self {
            exposure: number(Control::Exposure, neutral.exposure),
            contrast: number(Control::Contrast, neutral.contrast),
            mask_strength: number(Control::OrangeMask, neutral.mask_strength),
            channel_r: number(Control::ChannelR, neutral.channel_r),
            channel_g: number(Control::ChannelG, neutral.channel_g),
            channel_b: number(Control::ChannelB, neutral.channel_b),
            mode: controls
                .get(Control::Mode)
                .and_then(Mode::parse)
                .unwrap_or(neutral.mode),
        }
    }

    /// Replace any non-finite field with its neutral value.
    pub fn sanitized(self) -> Self {
        let neutral = Self::NEUTRAL;
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            exposure: finite_or(self.exposure, neutral.exposure),
            contrast: finite_or(self.contrast, neutral.contrast),
            mask_strength: finite_or(self.mask_strength, neutral.mask_strength),
            channel_r: finite_or(self.channel_r, neutral.channel_r),
            channel_g: finite_or(self.channel_g, neutral.channel_g),
            channel_b: finite_or(self.channel_b, neutral.channel_b),
            mode: self.mode,
        }
    }

    /// `[R, G, B]` post-inversion multipliers.
    pub fn channel_multipliers(&self) -> [f32; 3] {
        [self.channel_r, self.channel_g, self.channel_b]
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Coerce raw control text to a finite float.
fn coerce_number(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
