//! # Analog Stick Library
//!
//! Signal conditioning for the analog sticks of a USB game controller board.
//!
//! This library turns raw 12-bit ADC samples into calibrated, smoothed,
//! deadzone-shaped joystick values ready for a HID gamepad report. It also
//! provides the capture helpers used by calibration wizards and a persisted
//! options store for the per-stick configuration.

pub mod analog;
pub mod config;
pub mod error;
pub mod options;
