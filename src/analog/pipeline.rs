//! # Analog Input Pipeline
//!
//! Runs the full signal chain for every configured stick, once per
//! sampling cycle:
//!
//! ```text
//! ADC read → center-relative → range scale → [0,1] + inversion
//!          → adaptive smoothing → deadzone shaping → quantize → gamepad
//! ```
//!
//! Configuration is loaded once by [`AnalogInput::setup`]. Changing options
//! afterwards has no effect until the subsystem is set up again.
//!
//! ## Usage
//!
//! ```no_run
//! use analog_stick::analog::adc::IioAdc;
//! use analog_stick::analog::output::GamepadState;
//! use analog_stick::analog::pipeline::AnalogInput;
//! use analog_stick::options::AnalogOptions;
//!
//! let options = AnalogOptions::load("analog_options.toml")?;
//! let mut adc = IioAdc::open("/sys/bus/iio/devices/iio:device0")?;
//! let mut input = AnalogInput::setup(&options);
//! let mut gamepad = GamepadState::default();
//!
//! loop {
//!     input.process(&mut adc, &mut gamepad, None);
//!     // Hand `gamepad` to the HID report...
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use tracing::{debug, info};

use super::adc::{read_pin, AdcReader, ADC_CENTER};
use super::normalize::{apply_inversion, axis_travel, center_relative, to_unit_range};
use super::output::{ActiveDriver, GamepadState, JoystickRange};
use super::stick::{StickChannelConfig, StickRuntimeState};
use crate::options::{AnalogOptions, STICK_COUNT};

/// One stick: cached configuration plus runtime state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StickChannel {
    pub config: StickChannelConfig,
    pub state: StickRuntimeState,
}

/// The analog input subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogInput {
    sticks: [StickChannel; STICK_COUNT],
}

impl AnalogInput {
    /// Returns `true` if the analog subsystem is enabled in `options`.
    #[must_use]
    pub fn available(options: &AnalogOptions) -> bool {
        options.enabled
    }

    /// Builds the subsystem from persisted options.
    #[must_use]
    pub fn setup(options: &AnalogOptions) -> Self {
        let sticks = [
            StickChannelConfig::from_options(&options.stick1),
            StickChannelConfig::from_options(&options.stick2),
        ];

        for (i, config) in sticks.iter().enumerate() {
            debug!(
                "Stick {}: pins ({}, {}), routing {:?}, center ({}, {}), range calibrated: {}",
                i + 1,
                config.pin_x,
                config.pin_y,
                config.routing,
                config.center_x,
                config.center_y,
                config.range.has_data()
            );
        }
        info!("Analog input configured for {} sticks", STICK_COUNT);

        Self::from_configs(sticks)
    }

    /// Builds the subsystem from ready-made stick configurations.
    #[must_use]
    pub fn from_configs(configs: [StickChannelConfig; STICK_COUNT]) -> Self {
        Self {
            sticks: configs.map(|config| StickChannel {
                config,
                state: StickRuntimeState::default(),
            }),
        }
    }

    /// Returns the sticks, for diagnostics.
    #[must_use]
    pub fn sticks(&self) -> &[StickChannel; STICK_COUNT] {
        &self.sticks
    }

    /// Runs one sampling cycle for every stick.
    ///
    /// Sticks routed to [`OutputRouting::None`](super::output::OutputRouting::None)
    /// are processed but do not write `gamepad`.
    pub fn process<A: AdcReader + ?Sized>(
        &mut self,
        adc: &mut A,
        gamepad: &mut GamepadState,
        driver: Option<&ActiveDriver>,
    ) {
        let range = JoystickRange::for_driver(driver);

        for stick in &mut self.sticks {
            let (x, y) = process_stick(adc, &stick.config, &mut stick.state);
            gamepad.write_stick(stick.config.routing, range.quantize(x), range.quantize(y));
        }
    }
}

/// Runs the signal chain for one stick and returns the shaped pair (0.0 to 1.0).
fn process_stick<A: AdcReader + ?Sized>(
    adc: &mut A,
    config: &StickChannelConfig,
    state: &mut StickRuntimeState,
) -> (f32, f32) {
    // Absent axes stay at the calibrated center.
    let rel_x = read_pin(adc, config.pin_x)
        .map(|sample| center_relative(f32::from(sample), config.center_x))
        .unwrap_or(0.0);
    let rel_y = read_pin(adc, config.pin_y)
        .map(|sample| center_relative(f32::from(sample), config.center_y))
        .unwrap_or(0.0);

    let (scaled_x, scaled_y, scaled) = config.range.apply(rel_x, rel_y);

    // Scaled samples are already relative to the ideal radius.
    let (travel_x, travel_y) = if scaled {
        (ADC_CENTER, ADC_CENTER)
    } else {
        (
            axis_travel(scaled_x, config.center_x),
            axis_travel(scaled_y, config.center_y),
        )
    };

    let (mut x, mut y) = apply_inversion(
        to_unit_range(scaled_x, travel_x),
        to_unit_range(scaled_y, travel_y),
        config.invert,
    );

    if config.smoothing_enabled {
        x = config.smoothing.filter(x, state.x_ema);
        y = config.smoothing.filter(y, state.y_ema);
        state.x_ema = x;
        state.y_ema = y;
    }

    let shaped = config.deadzone.shape(x, y);

    state.x_value = shaped.x;
    state.y_value = shaped.y;
    state.x_magnitude = shaped.x_magnitude;
    state.y_magnitude = shaped.y_magnitude;
    state.magnitude = shaped.magnitude;
    state.angle = rel_y.atan2(rel_x);

    (shaped.x, shaped.y)
}
