//! Analog stick signal conditioning
//!
//! Converts noisy 12-bit ADC samples into calibrated, smoothed,
//! deadzone-corrected joystick axes. [`pipeline::AnalogInput`] runs the stages
//! in order each sampling cycle; [`calibration`] provides the raw-read and
//! save primitives used by the calibration flows.

pub mod adc;
pub mod calibration;
pub mod deadzone;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod range;
pub mod smoothing;
pub mod stick;

pub use output::{ActiveDriver, GamepadState, JoystickRange, OutputRouting};
pub use pipeline::AnalogInput;
pub use stick::{InvertMode, StickChannelConfig, StickRuntimeState};
