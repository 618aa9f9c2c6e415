//! # Stick Configuration and State
//!
//! [`StickChannelConfig`] is the cached, pipeline-ready form of one stick's
//! persisted options. It is built once at setup and not re-read per cycle.
//! [`StickRuntimeState`] carries what the pipeline remembers between cycles.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::adc::{is_valid_pin, ADC_CENTER, ADC_MAX};
use super::deadzone::DeadzoneShaper;
use super::normalize::ANALOG_CENTER;
use super::output::OutputRouting;
use super::range::RangeTable;
use super::smoothing::{AdaptiveSmoothing, DEFAULT_ALPHA_MAX, DEFAULT_DELTA_MAX};
use crate::options::StickOptions;

/// Axis inversion applied after normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvertMode {
    /// Axes pass through unchanged.
    #[default]
    None,
    /// Flips X.
    X,
    /// Flips Y.
    Y,
    /// Flips both axes.
    Both,
}

/// Cached configuration for one physical stick.
#[derive(Debug, Clone, PartialEq)]
pub struct StickChannelConfig {
    /// GPIO pin of the X axis.
    pub pin_x: i32,
    /// GPIO pin of the Y axis.
    pub pin_y: i32,
    /// Axis inversion.
    pub invert: InvertMode,
    /// Gamepad axis pair this stick feeds.
    pub routing: OutputRouting,
    /// Whether adaptive smoothing runs.
    pub smoothing_enabled: bool,
    /// Adaptive EMA coefficients.
    pub smoothing: AdaptiveSmoothing,
    /// Scale for the diagnostic magnitude (0.0 to 1.0).
    pub error_rate: f32,
    /// Inner deadzone and anti-deadzone.
    pub deadzone: DeadzoneShaper,
    /// Calibrated X center in raw counts.
    pub center_x: f32,
    /// Calibrated Y center in raw counts.
    pub center_y: f32,
    /// Angular range calibration; empty when uncalibrated.
    pub range: RangeTable,
}

impl Default for StickChannelConfig {
    fn default() -> Self {
        Self::from_options(&StickOptions::default())
    }
}

impl StickChannelConfig {
    /// Converts persisted options into pipeline units.
    ///
    /// Out-of-range values are clamped with a warning, never rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_stick::analog::stick::StickChannelConfig;
    /// use analog_stick::options::StickOptions;
    ///
    /// let mut options = StickOptions::default();
    /// options.inner_deadzone = 10;
    /// options.smoothing_factor = 20;
    ///
    /// let config = StickChannelConfig::from_options(&options);
    /// assert!((config.deadzone.inner() - 0.10).abs() < 1e-6);
    /// assert!((config.smoothing.base_alpha() - 0.20).abs() < 1e-6);
    /// assert_eq!(config.center_x, 2047.5); // uncalibrated
    /// ```
    #[must_use]
    pub fn from_options(options: &StickOptions) -> Self {
        let base_alpha = percent("smoothing_factor", options.smoothing_factor as f32);
        let delta_max = if options.smoothing_delta_max > 0.0 {
            percent("smoothing_delta_max", options.smoothing_delta_max)
        } else {
            DEFAULT_DELTA_MAX
        };
        let alpha_max = if options.smoothing_alpha_max > 0.0 {
            percent("smoothing_alpha_max", options.smoothing_alpha_max)
        } else {
            DEFAULT_ALPHA_MAX
        };

        let error_rate = if options.error_rate > 1000 {
            warn!("error_rate {} out of range, clamping to 1000", options.error_rate);
            1.0
        } else {
            options.error_rate as f32 / 1000.0
        };

        Self {
            pin_x: options.pin_x,
            pin_y: options.pin_y,
            invert: options.invert_mode,
            routing: options.output_routing,
            smoothing_enabled: options.smoothing_enabled,
            smoothing: AdaptiveSmoothing::new(base_alpha, delta_max, alpha_max),
            error_rate,
            deadzone: DeadzoneShaper::new(
                percent("inner_deadzone", options.inner_deadzone as f32),
                percent("anti_deadzone", options.anti_deadzone as f32),
            ),
            center_x: center("center_x", options.center_x),
            center_y: center("center_y", options.center_y),
            range: RangeTable::from_entries(&options.range_data, options.range_data_count),
        }
    }

    /// Returns `true` if the X axis has a valid ADC pin.
    #[must_use]
    pub fn has_x(&self) -> bool {
        is_valid_pin(self.pin_x)
    }

    /// Returns `true` if the Y axis has a valid ADC pin.
    #[must_use]
    pub fn has_y(&self) -> bool {
        is_valid_pin(self.pin_y)
    }
}

/// Converts a 0-100 percentage to a fraction, clamping out-of-range input.
fn percent(name: &str, value: f32) -> f32 {
    if !(0.0..=100.0).contains(&value) {
        warn!("{} {} out of range, clamping to 0-100", name, value);
    }
    value.clamp(0.0, 100.0) / 100.0
}

/// Resolves a stored center; 0 means uncalibrated.
fn center(name: &str, value: u32) -> f32 {
    match value {
        0 => ADC_CENTER,
        v if v > u32::from(ADC_MAX) => {
            warn!("{} {} out of range, clamping to {}", name, v, ADC_MAX);
            f32::from(ADC_MAX)
        }
        v => v as f32,
    }
}

/// Per-stick values carried between sampling cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickRuntimeState {
    /// Last filtered X (smoothing history).
    pub x_ema: f32,
    /// Last filtered Y (smoothing history).
    pub y_ema: f32,
    /// Last output X (0.0 to 1.0).
    pub x_value: f32,
    /// Last output Y (0.0 to 1.0).
    pub y_value: f32,
    pub x_magnitude: f32,
    pub y_magnitude: f32,
    /// Distance from center before deadzone shaping.
    pub magnitude: f32,
    /// Stick direction in radians, center-relative space.
    pub angle: f32,
}

impl Default for StickRuntimeState {
    fn default() -> Self {
        Self {
            x_ema: ANALOG_CENTER,
            y_ema: ANALOG_CENTER,
            x_value: ANALOG_CENTER,
            y_value: ANALOG_CENTER,
            x_magnitude: 0.0,
            y_magnitude: 0.0,
            magnitude: 0.0,
            angle: 0.0,
        }
    }
}

impl StickRuntimeState {
    /// Magnitude scaled by the stick's error rate, for diagnostics.
    #[must_use]
    pub fn scaled_magnitude(&self, error_rate: f32) -> f32 {
        error_rate * self.magnitude
    }
}
