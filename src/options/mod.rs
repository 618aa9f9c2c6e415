//! # Persisted Analog Options
//!
//! The per-stick option set stored on the device and edited by the
//! calibration and tuning flows.
//!
//! Values are stored the way the configurator presents them: percentages as
//! 0-100, the error rate as 0-1000, centers as raw ADC counts. Conversion to
//! the fractional values the pipeline uses happens once, in
//! [`StickChannelConfig::from_options`](crate::analog::stick::StickChannelConfig::from_options).
//!
//! ## File Format
//!
//! ```toml
//! enabled = true
//!
//! [stick1]
//! pin_x = 26
//! pin_y = 27
//! output_routing = "left_analog"
//! inner_deadzone = 5
//! center_x = 2051
//! center_y = 2040
//! ```

pub mod store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analog::adc::PIN_UNASSIGNED;
use crate::analog::output::OutputRouting;
use crate::analog::stick::InvertMode;
use crate::error::Result;

/// Number of analog sticks the board supports.
pub const STICK_COUNT: usize = 2;

/// Options for the whole analog subsystem.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalogOptions {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub stick1: StickOptions,

    #[serde(default)]
    pub stick2: StickOptions,
}

/// Options for one stick.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StickOptions {
    #[serde(default = "default_pin")]
    pub pin_x: i32,

    #[serde(default = "default_pin")]
    pub pin_y: i32,

    #[serde(default)]
    pub invert_mode: InvertMode,

    #[serde(default)]
    pub output_routing: OutputRouting,

    #[serde(default)]
    pub smoothing_enabled: bool,

    /// Base EMA coefficient, percent.
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: u32,

    /// Adaptive speed threshold, percent. 0 selects the built-in default.
    #[serde(default)]
    pub smoothing_delta_max: f32,

    /// Adaptive maximum coefficient, percent. 0 selects the built-in default.
    #[serde(default)]
    pub smoothing_alpha_max: f32,

    /// Magnitude error scale, per mille.
    #[serde(default = "default_error_rate")]
    pub error_rate: u32,

    /// Inner deadzone radius, percent.
    #[serde(default = "default_inner_deadzone")]
    pub inner_deadzone: u32,

    /// Anti-deadzone baseline, percent.
    #[serde(default)]
    pub anti_deadzone: u32,

    /// Calibrated X center in raw counts. 0 means uncalibrated.
    #[serde(default)]
    pub center_x: u32,

    /// Calibrated Y center in raw counts. 0 means uncalibrated.
    #[serde(default)]
    pub center_y: u32,

    /// Angular range calibration ratios.
    #[serde(default)]
    pub range_data: Vec<f32>,

    /// Number of valid entries in `range_data`.
    #[serde(default)]
    pub range_data_count: usize,
}

// Default value functions
fn default_pin() -> i32 { PIN_UNASSIGNED }
fn default_smoothing_factor() -> u32 { 15 }
fn default_error_rate() -> u32 { 1000 }
fn default_inner_deadzone() -> u32 { 5 }

impl Default for StickOptions {
    fn default() -> Self {
        Self {
            pin_x: default_pin(),
            pin_y: default_pin(),
            invert_mode: InvertMode::default(),
            output_routing: OutputRouting::default(),
            smoothing_enabled: false,
            smoothing_factor: default_smoothing_factor(),
            smoothing_delta_max: 0.0,
            smoothing_alpha_max: 0.0,
            error_rate: default_error_rate(),
            inner_deadzone: default_inner_deadzone(),
            anti_deadzone: 0,
            center_x: 0,
            center_y: 0,
            range_data: Vec::new(),
            range_data_count: 0,
        }
    }
}

impl AnalogOptions {
    /// Load options from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_stick::options::AnalogOptions;
    ///
    /// let options = AnalogOptions::load("analog_options.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let options: AnalogOptions = toml::from_str(&contents)?;
        Ok(options)
    }

    /// Serializes the options to TOML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns the options of stick `index` (0 or 1).
    #[must_use]
    pub fn stick(&self, index: usize) -> Option<&StickOptions> {
        match index {
            0 => Some(&self.stick1),
            1 => Some(&self.stick2),
            _ => None,
        }
    }

    /// Returns the mutable options of stick `index` (0 or 1).
    pub fn stick_mut(&mut self, index: usize) -> Option<&mut StickOptions> {
        match index {
            0 => Some(&mut self.stick1),
            1 => Some(&mut self.stick2),
            _ => None,
        }
    }
}
