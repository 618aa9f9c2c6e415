//! # Coordinate Normalizer
//!
//! Moves raw ADC samples into a coordinate space centered on the stick's
//! physical rest position, then maps that space onto the normalized
//! `0.0..=1.0` axis range used by the rest of the pipeline (0.5 = center).
//!
//! ## Center-Relative Space
//!
//! ```text
//! sample_offset = sample - 2047.5
//! center_offset = center - 2047.5
//! relative      = sample_offset - center_offset
//! ```
//!
//! The result is in ADC units and can be negative. A stick whose resting
//! position is off by a few counts still reads `0.0` at rest.

use super::adc::{ADC_CENTER, ADC_MAX};
use super::stick::InvertMode;

/// Normalized axis maximum.
pub const ANALOG_MAX: f32 = 1.0;
/// Normalized axis center.
pub const ANALOG_CENTER: f32 = 0.5;
/// Normalized axis minimum.
pub const ANALOG_MINIMUM: f32 = 0.0;

/// Re-centers a raw sample around the calibrated stick center.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::normalize::center_relative;
///
/// assert_eq!(center_relative(4095.0, 2047.5), 2047.5);
/// assert_eq!(center_relative(2048.0, 2048.0), 0.0);
/// ```
#[must_use]
pub fn center_relative(sample: f32, center: f32) -> f32 {
    let sample_offset = sample - ADC_CENTER;
    let center_offset = center - ADC_CENTER;
    sample_offset - center_offset
}

/// Distance from the calibrated center to the ADC rail on the side `relative` points to.
///
/// Never smaller than one count, so a center parked on a rail cannot divide by zero.
#[must_use]
pub fn axis_travel(relative: f32, center: f32) -> f32 {
    let travel = if relative >= 0.0 {
        f32::from(ADC_MAX) - center
    } else {
        center
    };
    travel.max(1.0)
}

/// Maps a center-relative value onto `0.0..=1.0` given the travel available in that direction.
///
/// With [`axis_travel`] as the divisor, each side of an off-center stick has
/// its own gain: both rails land exactly on 0.0 and 1.0, but equal counts
/// either side of rest do not move the same distance. A center of 1900 maps
/// +50 counts to +0.0114 and -50 counts to -0.0132.
///
/// The result is not clamped; later stages clamp.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::normalize::to_unit_range;
///
/// assert_eq!(to_unit_range(0.0, 2047.5), 0.5);
/// assert_eq!(to_unit_range(2047.5, 2047.5), 1.0);
/// assert_eq!(to_unit_range(-2047.5, 2047.5), 0.0);
/// ```
#[must_use]
pub fn to_unit_range(relative: f32, travel: f32) -> f32 {
    ANALOG_CENTER + (relative / travel) * ANALOG_CENTER
}

/// Applies the configured inversion to a normalized pair.
#[must_use]
pub fn apply_inversion(x: f32, y: f32, mode: InvertMode) -> (f32, f32) {
    match mode {
        InvertMode::None => (x, y),
        InvertMode::X => (ANALOG_MAX - x, y),
        InvertMode::Y => (x, ANALOG_MAX - y),
        InvertMode::Both => (ANALOG_MAX - x, ANALOG_MAX - y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== center_relative Tests ====================

    #[test]
    fn test_theoretical_center_is_identity_offset() {
        for sample in [0u16, 1, 1000, 2047, 2048, 3000, 4094, 4095] {
            let sample = f32::from(sample);
            assert_eq!(center_relative(sample, ADC_CENTER), sample - 2047.5);
        }
    }

    #[test]
    fn test_calibrated_center_reads_zero_at_rest() {
        assert_eq!(center_relative(1980.0, 1980.0), 0.0);
        assert_eq!(center_relative(2110.0, 2110.0), 0.0);
    }

    #[test]
    fn test_center_relative_always_finite() {
        for sample in (0..=4095u16).step_by(97) {
            for center in (0..=4095u16).step_by(89) {
                let value = center_relative(f32::from(sample), f32::from(center));
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn test_center_relative_sign() {
        assert!(center_relative(3000.0, 2000.0) > 0.0);
        assert!(center_relative(1000.0, 2000.0) < 0.0);
    }

    // ==================== Travel and Unit Range Tests ====================

    #[test]
    fn test_axis_travel_per_side() {
        assert_eq!(axis_travel(10.0, 2048.0), 2047.0);
        assert_eq!(axis_travel(-10.0, 2048.0), 2048.0);
    }

    #[test]
    fn test_axis_travel_center_on_rail() {
        assert_eq!(axis_travel(5.0, 4095.0), 1.0);
        assert_eq!(axis_travel(-5.0, 0.0), 1.0);
    }

    #[test]
    fn test_full_deflection_reaches_rails_with_offset_center() {
        let center = 2048.0;

        let right = center_relative(4095.0, center);
        assert_eq!(to_unit_range(right, axis_travel(right, center)), 1.0);

        let left = center_relative(0.0, center);
        assert_eq!(to_unit_range(left, axis_travel(left, center)), 0.0);
    }

    #[test]
    fn test_off_center_stick_has_per_side_gain() {
        let center = 1900.0;
        let unit = |sample: f32| {
            let rel = center_relative(sample, center);
            to_unit_range(rel, axis_travel(rel, center))
        };

        let up = unit(1950.0) - ANALOG_CENTER;
        let down = ANALOG_CENTER - unit(1850.0);
        assert!((up - 50.0 / 2195.0 * 0.5).abs() < 1e-6);
        assert!((down - 50.0 / 1900.0 * 0.5).abs() < 1e-6);
        assert!(down > up);

        // Both rails still reach the ends of the range
        assert_eq!(unit(0.0), 0.0);
        assert_eq!(unit(4095.0), 1.0);
    }

    // ==================== Inversion Tests ====================

    #[test]
    fn test_inversion_modes() {
        assert_eq!(apply_inversion(0.25, 0.75, InvertMode::None), (0.25, 0.75));
        assert_eq!(apply_inversion(0.25, 0.75, InvertMode::X), (0.75, 0.75));
        assert_eq!(apply_inversion(0.25, 0.75, InvertMode::Y), (0.25, 0.25));
        assert_eq!(apply_inversion(0.25, 0.75, InvertMode::Both), (0.75, 0.25));
    }

    #[test]
    fn test_inversion_keeps_center() {
        assert_eq!(
            apply_inversion(ANALOG_CENTER, ANALOG_CENTER, InvertMode::Both),
            (ANALOG_CENTER, ANALOG_CENTER)
        );
    }
}
