//! Raw control state.
//!
//! Controls hold text exactly as it was entered, the way a slider or a
//! numeric field would. Nothing is validated here; coercion happens when a
//! [`ParameterSet`](crate::params::ParameterSet) snapshot is taken.

use crate::config::AdjustmentsConfig;
use crate::params::ParameterSet;

/// One adjustable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Exposure,
    Contrast,
    OrangeMask,
    ChannelR,
    ChannelG,
    ChannelB,
    Mode,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Exposure,
        Control::Contrast,
        Control::OrangeMask,
        Control::ChannelR,
        Control::ChannelG,
        Control::ChannelB,
        Control::Mode,
    ];

    /// Canonical name, as accepted on the command line and in `tune`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exposure => "exposure",
            Self::Contrast => "contrast",
            Self::OrangeMask => "mask",
            Self::ChannelR => "red",
            Self::ChannelG => "green",
            Self::ChannelB => "blue",
            Self::Mode => "mode",
        }
    }

    /// Look up a control by name or alias. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "exposure" | "exp" => Some(Self::Exposure),
            "contrast" => Some(Self::Contrast),
            "mask" | "orange-mask" => Some(Self::OrangeMask),
            "red" | "r" | "channel-r" => Some(Self::ChannelR),
            "green" | "g" | "channel-g" => Some(Self::ChannelG),
            "blue" | "b" | "channel-b" => Some(Self::ChannelB),
            "mode" => Some(Self::Mode),
            _ => None,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Exposure => 0,
            Self::Contrast => 1,
            Self::OrangeMask => 2,
            Self::ChannelR => 3,
            Self::ChannelG => 4,
            Self::ChannelB => 5,
            Self::Mode => 6,
        }
    }
}

/// Current text of every control. `None` means the control was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlState {
    values: [Option<String>; 7],
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed controls with the starting values from the config file.
    pub fn from_adjustments(adjustments: &AdjustmentsConfig) -> Self {
        let mut state = Self::new();
        state.set(Control::Exposure, adjustments.exposure.to_string());
        state.set(Control::Contrast, adjustments.contrast.to_string());
        state.set(Control::OrangeMask, adjustments.mask_strength.to_string());
        state.set(Control::ChannelR, adjustments.red.to_string());
        state.set(Control::ChannelG, adjustments.green.to_string());
        state.set(Control::ChannelB, adjustments.blue.to_string());
        state.set(Control::Mode, adjustments.mode.label());
        state
    }

    pub fn set(&mut self, control: Control, raw: impl Into<String>) {
        self.values[control.slot()] = Some(raw.into());
    }

    pub fn get(&self, control: Control) -> Option<&str> {
        self.values[control.slot()].as_deref()
    }

    /// Forget every value, returning all controls to neutral.
    pub fn reset(&mut self) {
        self.values = Default::default();
    }

    /// Take a parameter snapshot of the current values.
    pub fn snapshot(&self) -> ParameterSet {
        ParameterSet::from_controls(self)
    }
}
