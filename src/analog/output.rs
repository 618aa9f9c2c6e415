//! # Output Quantization
//!
//! Converts normalized axis values into the integer joystick range of the
//! active USB output driver and routes them into the gamepad state.
//!
//! ## Joystick Range
//!
//! Drivers report a joystick midpoint; the maximum is twice that. A 0x8000
//! midpoint implies a 0x10000 maximum, which does not fit in 16 bits, so the
//! quantized value is capped at 0xFFFF.
//!
//! | Value | Output |
//! |-------|--------|
//! | 0.0 | 0 |
//! | 0.5 | midpoint |
//! | 1.0 | min(max, 0xFFFF) |

use serde::{Deserialize, Serialize};

/// Midpoint used when no output driver is active.
pub const DEFAULT_JOYSTICK_MID: u32 = 0x8000;

/// Maximum used when no output driver is active.
pub const DEFAULT_JOYSTICK_MAX: u32 = DEFAULT_JOYSTICK_MID * 2;

/// Largest value a gamepad axis field can hold.
pub const AXIS_OUTPUT_LIMIT: u32 = 0xFFFF;

/// Gamepad axis pair a stick feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputRouting {
    /// Stick is sampled but writes nothing.
    #[default]
    None,
    /// Feeds `lx` / `ly`.
    LeftAnalog,
    /// Feeds `rx` / `ry`.
    RightAnalog,
}

/// Information published by the active output driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDriver {
    /// Joystick midpoint reported by the driver.
    pub joystick_mid: u32,
}

/// Integer joystick range of the output protocol.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::output::{ActiveDriver, JoystickRange};
///
/// let fallback = JoystickRange::for_driver(None);
/// assert_eq!(fallback.mid, 0x8000);
///
/// let driver = ActiveDriver { joystick_mid: 0x7FFF };
/// let range = JoystickRange::for_driver(Some(&driver));
/// assert_eq!(range.max, 0xFFFE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickRange {
    /// Centered value.
    pub mid: u32,
    /// Full-deflection value.
    pub max: u32,
}

impl Default for JoystickRange {
    fn default() -> Self {
        Self {
            mid: DEFAULT_JOYSTICK_MID,
            max: DEFAULT_JOYSTICK_MAX,
        }
    }
}

impl JoystickRange {
    /// Derives the range from a midpoint (max = 2 × mid).
    #[must_use]
    pub fn from_midpoint(mid: u32) -> Self {
        Self {
            mid,
            max: mid.saturating_mul(2),
        }
    }

    /// Range of the active driver, or the built-in default when there is none.
    #[must_use]
    pub fn for_driver(driver: Option<&ActiveDriver>) -> Self {
        driver
            .map(|d| Self::from_midpoint(d.joystick_mid))
            .unwrap_or_default()
    }

    /// Quantizes a normalized value (0.0 to 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_stick::analog::output::JoystickRange;
    ///
    /// let range = JoystickRange::default();
    /// assert_eq!(range.quantize(0.0), 0);
    /// assert_eq!(range.quantize(0.5), 0x8000);
    /// assert_eq!(range.quantize(1.0), 0xFFFF);
    /// ```
    #[must_use]
    pub fn quantize(&self, value: f32) -> u16 {
        let value = value.clamp(0.0, 1.0);
        let scaled = (f64::from(self.max) * f64::from(value)).round() as u32;
        scaled.min(AXIS_OUTPUT_LIMIT) as u16
    }
}

/// Stick fields of the shared gamepad report state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadState {
    /// Left stick X.
    pub lx: u16,
    /// Left stick Y.
    pub ly: u16,
    /// Right stick X.
    pub rx: u16,
    /// Right stick Y.
    pub ry: u16,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self::centered(&JoystickRange::default())
    }
}

impl GamepadState {
    /// Creates a state with every axis at the range midpoint.
    #[must_use]
    pub fn centered(range: &JoystickRange) -> Self {
        let mid = range.mid.min(AXIS_OUTPUT_LIMIT) as u16;
        Self {
            lx: mid,
            ly: mid,
            rx: mid,
            ry: mid,
        }
    }

    /// Writes a quantized pair to the fields selected by `routing`.
    pub fn write_stick(&mut self, routing: OutputRouting, x: u16, y: u16) {
        match routing {
            OutputRouting::LeftAnalog => {
                self.lx = x;
                self.ly = y;
            }
            OutputRouting::RightAnalog => {
                self.rx = x;
                self.ry = y;
            }
            OutputRouting::None => {}
        }
    }
}
