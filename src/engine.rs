//! Negative-to-positive pixel transform.
//!
//! Every pixel goes through the same fixed chain. Only R, G and B are
//! touched; alpha passes through bit for bit.
//!
//! ```text
//!   in ──→ 255−c ──→ ÷mask (color) ──→ ×RGB (color) ──→ ×exposure ──→ contrast ──→ avg (bw) ──→ clamp ──→ out
//! ```
//!
//! # Stages
//!
//! 1. **Invert**: `c = 255 − c`.
//! 2. **Orange-mask removal** (color only). Film base is roughly R 0.9,
//!    G 0.5, B 0.2 after normalization, so G and B are divided back up:
//!    ```text
//!    g = g / (0.5 + 0.5 × mask)
//!    b = b / (0.2 + 0.2 × mask)
//!    ```
//!    R is left alone. A stronger mask grows the divisor and pulls the
//!    channel down proportionally.
//! 3. **Channel multipliers** (color only): white-balance trim after the mask.
//! 4. **Exposure**: uniform gain in both modes.
//! 5. **Contrast** around mid-gray:
//!    ```text
//!    factor = 259 × (contrast × 255 + 255) / (255 × (259 − contrast × 255))
//!    c = factor × (c − 128) + 128
//!    ```
//! 6. **Black and white**: R, G, B replaced by their plain average.
//! 7. **Clamp** to `[0, 255]` and round half to even. This happens once, at
//!    the very end; intermediate values are free to overshoot.
//!
//! # Non-finite values
//!
//! A mask strength of −1 zeroes both divisors and a contrast at or past
//! `259/255` zeroes the contrast denominator. The clamp maps `NaN` to 0,
//! `+∞` to 255 and `−∞` to 0. The contrast stage never produces them on its
//! own: once the denominator reaches zero it switches to
//! [`ContrastCurve::Threshold`], the limit of the curve.

use crate::buffer::PixelBuffer;
use crate::params::{Mode, ParameterSet};
use tracing::debug;

/// Normalized film-base green, the stage-2 green divisor at zero mask.
pub const ORANGE_MASK_GREEN: f32 = 0.5;
/// Normalized film-base blue, the stage-2 blue divisor at zero mask.
pub const ORANGE_MASK_BLUE: f32 = 0.2;
/// Contrast pivot.
pub const MID_GRAY: f32 = 128.0;

/// Render `source` into a new buffer.
///
/// `source` is only read, so callers can keep re-rendering from the same
/// original without edits compounding.
pub fn transform(source: &PixelBuffer, params: &ParameterSet) -> PixelBuffer {
    let mut out = source.clone();
    transform_in_place(&mut out, params);
    out
}

/// Render into `buffer`, overwriting its R, G and B channels.
///
/// `buffer` must be a fresh copy of the original; running this twice on the
/// same buffer stacks the adjustments.
pub fn transform_in_place(buffer: &mut PixelBuffer, params: &ParameterSet) {
    let pipeline = Pipeline::new(params);
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        pixels = buffer.pixel_count(),
        exposure = params.exposure,
        contrast = params.contrast,
        mask = params.mask_strength,
        mode = %params.mode,
        "rendering"
    );
    for px in buffer.pixels_mut() {
        let [r, g, b] = pipeline.apply([px[0], px[1], px[2]]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
}

/// The transform with per-call constants already derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipeline {
    mode: Mode,
    green_divisor: f32,
    blue_divisor: f32,
    multipliers: [f32; 3],
    exposure: f32,
    contrast: ContrastCurve,
}

impl Pipeline {
    pub fn new(params: &ParameterSet) -> Self {
        Self {
            mode: params.mode,
            green_divisor: ORANGE_MASK_GREEN + ORANGE_MASK_GREEN * params.mask_strength,
            blue_divisor: ORANGE_MASK_BLUE + ORANGE_MASK_BLUE * params.mask_strength,
            multipliers: params.channel_multipliers(),
            exposure: params.exposure,
            contrast: ContrastCurve::from_contrast(params.contrast),
        }
    }

    pub fn contrast(&self) -> ContrastCurve {
        self.contrast
    }

    /// Run stages 1–6 on one pixel, returning unclamped values.
    pub fn evaluate(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut c = rgb.map(|v| 255.0 - v);

        if self.mode.is_color() {
            c[1] /= self.green_divisor;
            c[2] /= self.blue_divisor;

            for (value, mult) in c.iter_mut().zip(self.multipliers) {
                *value *= mult;
            }
        }

        let c = c.map(|v| self.contrast.apply(v * self.exposure));

        match self.mode {
            Mode::Color => c,
            Mode::BlackWhite => {
                let avg = (c[0] + c[1] + c[2]) / 3.0;
                [avg; 3]
            }
        }
    }

    /// Run the whole chain on one 8-bit pixel.
    pub fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        self.evaluate(rgb.map(f32::from)).map(clamp_channel)
    }
}

/// Contrast stage, resolved once per render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContrastCurve {
    /// `factor × (c − 128) + 128`.
    Linear { factor: f32 },
    /// Denominator reached zero: everything above mid-gray goes to white,
    /// everything below to black, mid-gray stays.
    Threshold,
}

impl ContrastCurve {
    pub fn from_contrast(contrast: f32) -> Self {
        let scaled = contrast * 255.0;
        let denominator = 255.0 * (259.0 - scaled);
        if denominator <= 0.0 {
            return Self::Threshold;
        }
        let factor = 259.0 * (scaled + 255.0) / denominator;
        if factor.is_finite() {
            Self::Linear { factor }
        } else {
            Self::Threshold
        }
    }

    pub fn apply(self, c: f32) -> f32 {
        match self {
            Self::Linear { factor } => factor * (c - MID_GRAY) + MID_GRAY,
            Self::Threshold if c > MID_GRAY => 255.0,
            Self::Threshold if c < MID_GRAY => 0.0,
            Self::Threshold => c,
        }
    }
}

/// Final quantization. `NaN` becomes 0, infinities saturate.
pub fn clamp_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}
