//! # Adaptive Smoothing
//!
//! Exponential moving average whose coefficient follows the stick's speed.
//!
//! A fixed-coefficient EMA is either laggy (low α) or jittery (high α). Here α
//! moves between a base value and a maximum depending on how far the input
//! jumped since the last cycle:
//!
//! ```text
//! delta        = |value - previous|
//! speed_factor = min(delta / delta_max, 1)
//! α            = clamp(α_base + (α_max - α_base) × speed_factor, 0.01, 0.99)
//! output       = α × value + (1 - α) × previous
//! ```
//!
//! Slow drift near rest is filtered heavily, while a fast flick passes almost
//! unchanged.

/// Lower bound for the effective coefficient.
pub const MIN_ALPHA: f32 = 0.01;

/// Upper bound for the effective coefficient.
pub const MAX_ALPHA: f32 = 0.99;

/// `delta_max` at or below this disables the adaptive path.
pub const DELTA_MAX_EPSILON: f32 = 0.0001;

/// Default speed threshold (1.5% of the axis range).
pub const DEFAULT_DELTA_MAX: f32 = 0.015;

/// Default coefficient at full speed.
pub const DEFAULT_ALPHA_MAX: f32 = 0.95;

/// Tuning for one stick's adaptive filter.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::smoothing::AdaptiveSmoothing;
///
/// let filter = AdaptiveSmoothing::new(0.15, 0.015, 0.95);
///
/// // At rest the output does not move
/// assert_eq!(filter.filter(0.5, 0.5), 0.5);
///
/// // A large jump passes through almost unchanged
/// assert!(filter.filter(1.0, 0.5) > 0.97);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSmoothing {
    base_alpha: f32,
    delta_max: f32,
    alpha_max: f32,
}

impl Default for AdaptiveSmoothing {
    fn default() -> Self {
        Self {
            base_alpha: 0.15,
            delta_max: DEFAULT_DELTA_MAX,
            alpha_max: DEFAULT_ALPHA_MAX,
        }
    }
}

impl AdaptiveSmoothing {
    /// Creates a filter from fractional parameters (0.0 to 1.0).
    #[must_use]
    pub fn new(base_alpha: f32, delta_max: f32, alpha_max: f32) -> Self {
        Self {
            base_alpha,
            delta_max,
            alpha_max,
        }
    }

    /// Returns the base coefficient.
    #[must_use]
    pub fn base_alpha(&self) -> f32 {
        self.base_alpha
    }

    /// Returns the speed threshold.
    #[must_use]
    pub fn delta_max(&self) -> f32 {
        self.delta_max
    }

    /// Returns the coefficient used at full speed.
    #[must_use]
    pub fn alpha_max(&self) -> f32 {
        self.alpha_max
    }

    /// Effective coefficient for an input jump of `delta`.
    #[must_use]
    pub fn dynamic_alpha(&self, delta: f32) -> f32 {
        if self.delta_max <= DELTA_MAX_EPSILON {
            return self.base_alpha.clamp(MIN_ALPHA, MAX_ALPHA);
        }

        let speed_factor = (delta / self.delta_max).min(1.0);
        let alpha = self.base_alpha + (self.alpha_max - self.base_alpha) * speed_factor;
        alpha.clamp(MIN_ALPHA, MAX_ALPHA)
    }

    /// Filters `value` against the previous cycle's output.
    #[must_use]
    pub fn filter(&self, value: f32, previous: f32) -> f32 {
        let alpha = self.dynamic_alpha((value - previous).abs());
        // Same as α·value + (1-α)·previous, but exact when value == previous.
        previous + alpha * (value - previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Coefficient Tests ====================

    #[test]
    fn test_default_parameters() {
        let filter = AdaptiveSmoothing::default();
        assert_eq!(filter.delta_max(), 0.015);
        assert_eq!(filter.alpha_max(), 0.95);
    }

    #[test]
    fn test_alpha_at_rest_is_base() {
        let filter = AdaptiveSmoothing::new(0.2, 0.015, 0.95);
        assert!((filter.dynamic_alpha(0.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_at_full_speed_is_max() {
        let filter = AdaptiveSmoothing::new(0.2, 0.015, 0.95);
        assert!((filter.dynamic_alpha(0.015) - 0.95).abs() < 1e-6);
        assert!((filter.dynamic_alpha(0.5) - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_halfway() {
        let filter = AdaptiveSmoothing::new(0.2, 0.02, 0.8);
        assert!((filter.dynamic_alpha(0.01) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_is_clamped() {
        let filter = AdaptiveSmoothing::new(0.0, 0.015, 1.0);
        assert_eq!(filter.dynamic_alpha(0.0), MIN_ALPHA);
        assert_eq!(filter.dynamic_alpha(1.0), MAX_ALPHA);
    }

    #[test]
    fn test_zero_delta_max_uses_clamped_base() {
        for delta_max in [0.0, 0.00005, 0.0001, -1.0] {
            for base in [0.0, 0.3, 1.0] {
                let filter = AdaptiveSmoothing::new(base, delta_max, 0.95);
                for delta in [0.0, 0.01, 0.5, 1.0] {
                    assert_eq!(filter.dynamic_alpha(delta), base.clamp(MIN_ALPHA, MAX_ALPHA));
                }
            }
        }
    }

    // ==================== Filter Tests ====================

    #[test]
    fn test_steady_state_is_idempotent() {
        let filter = AdaptiveSmoothing::new(0.15, 0.015, 0.95);
        for value in [0.0, 0.1234, 0.5, 0.77, 1.0] {
            let mut previous = value;
            for _ in 0..50 {
                previous = filter.filter(value, previous);
                assert_eq!(previous, value);
            }
        }
    }

    #[test]
    fn test_slow_drift_is_smoothed() {
        let filter = AdaptiveSmoothing::new(0.1, 0.015, 0.95);
        let out = filter.filter(0.502, 0.5);
        assert!(out > 0.5 && out < 0.502);
        // Most of a tiny step is suppressed
        assert!(out - 0.5 < 0.001);
    }

    #[test]
    fn test_fast_motion_passes_through() {
        let filter = AdaptiveSmoothing::new(0.1, 0.015, 0.95);
        let out = filter.filter(1.0, 0.5);
        assert!((out - (0.95 * 1.0 + 0.05 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_converges_to_step_input() {
        let filter = AdaptiveSmoothing::new(0.15, 0.015, 0.95);
        let mut value = 0.5;
        for _ in 0..200 {
            value = filter.filter(0.8, value);
        }
        assert!((value - 0.8).abs() < 1e-4);
    }
}
