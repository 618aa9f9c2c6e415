//! # Deadzone Shaping
//!
//! Radial inner deadzone and anti-deadzone on a normalized stick pair.
//!
//! ## Inner Deadzone
//!
//! Any point closer to `(0.5, 0.5)` than the inner radius snaps to exactly
//! center. Suppression is total, not a rescale.
//!
//! ## Anti-Deadzone
//!
//! Just outside the inner deadzone, the output vector is lengthened to at
//! least `baseline × 0.5`, so the first intentional movement already produces
//! `baseline` of the full deflection. Games with their own deadzone would
//! otherwise swallow it.

use super::normalize::{ANALOG_CENTER, ANALOG_MAX, ANALOG_MINIMUM};

/// Result of shaping one stick pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shaped {
    /// Shaped X value (0.0 to 1.0).
    pub x: f32,
    /// Shaped Y value (0.0 to 1.0).
    pub y: f32,
    /// X offset from center that drove the output.
    pub x_magnitude: f32,
    /// Y offset from center that drove the output.
    pub y_magnitude: f32,
    /// Distance from center before shaping.
    pub magnitude: f32,
}

/// Inner deadzone and anti-deadzone settings for one stick.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::deadzone::DeadzoneShaper;
///
/// let shaper = DeadzoneShaper::new(0.05, 0.0);
///
/// let rest = shaper.shape(0.51, 0.52);
/// assert_eq!((rest.x, rest.y), (0.5, 0.5));
///
/// let moved = shaper.shape(0.9, 0.5);
/// assert_eq!((moved.x, moved.y), (0.9, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadzoneShaper {
    inner: f32,
    anti: f32,
}

impl Default for DeadzoneShaper {
    fn default() -> Self {
        Self {
            inner: 0.05,
            anti: 0.0,
        }
    }
}

impl DeadzoneShaper {
    /// Creates a shaper from fractional radii.
    ///
    /// # Arguments
    ///
    /// * `inner` - Inner deadzone radius, in normalized units (0.5 = full deflection)
    /// * `anti` - Anti-deadzone baseline (0.0 to 1.0). 0.0 disables it.
    #[must_use]
    pub fn new(inner: f32, anti: f32) -> Self {
        Self { inner, anti }
    }

    /// Returns the inner deadzone radius.
    #[must_use]
    pub fn inner(&self) -> f32 {
        self.inner
    }

    /// Returns the anti-deadzone baseline.
    #[must_use]
    pub fn anti(&self) -> f32 {
        self.anti
    }

    /// Shapes a normalized pair.
    #[must_use]
    pub fn shape(&self, x: f32, y: f32) -> Shaped {
        let mut x_magnitude = x - ANALOG_CENTER;
        let mut y_magnitude = y - ANALOG_CENTER;
        let distance = x_magnitude.hypot(y_magnitude);

        let (x, y) = if distance < self.inner {
            (ANALOG_CENTER, ANALOG_CENTER)
        } else if self.anti > 0.0 && distance > 0.0 {
            let normalized = (distance / ANALOG_CENTER).min(1.0);
            let baseline = self.anti.clamp(0.0, 1.0);
            if normalized < baseline {
                let scale = baseline * ANALOG_CENTER / distance;
                x_magnitude *= scale;
                y_magnitude *= scale;
                (x_magnitude + ANALOG_CENTER, y_magnitude + ANALOG_CENTER)
            } else {
                (x, y)
            }
        } else {
            (x, y)
        };

        Shaped {
            x: x.clamp(ANALOG_MINIMUM, ANALOG_MAX),
            y: y.clamp(ANALOG_MINIMUM, ANALOG_MAX),
            x_magnitude,
            y_magnitude,
            magnitude: distance,
        }
    }
}
