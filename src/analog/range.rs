//! # Range Calibration
//!
//! Compensates for sticks whose mechanical travel is not a perfect circle
//! (square gates, worn joints) using a 48-bucket angular table.
//!
//! Each bucket stores the ratio between the measured outer radius at that
//! angle and the ideal radius (2047.5 ADC counts). Zero means "no data".
//! Dividing a center-relative sample by the interpolated ratio projects the
//! real travel onto the ideal circle.
//!
//! ## Bucket Layout
//!
//! ```text
//! index = (atan2(y, x) + π) / 2π × 48
//! ```
//!
//! Bucket 0 starts at -π. Neighbors are interpolated linearly, with bucket 47
//! wrapping around to bucket 0.
//!
//! ## Recording
//!
//! [`RangeRecorder`] builds a table from a stream of raw samples while the
//! user rotates the stick against its gate.

use std::f32::consts::PI;

use super::adc::ADC_CENTER;

/// Number of angular buckets in a range table.
pub const RANGE_TABLE_SIZE: usize = 48;

/// Minimum normalized distance for a sample to count as "at the gate".
pub const EXTREME_THRESHOLD: f32 = 0.95;

/// Fraction of buckets that must be filled to complete one rotation.
pub const CYCLE_FILL_THRESHOLD: f32 = 0.95;

/// Rotations needed for full recording progress.
pub const REQUIRED_FULL_CYCLES: u32 = 4;

/// Per-angle outer radius ratios for one stick.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::range::RangeTable;
///
/// let table = RangeTable::empty();
/// assert!(!table.has_data());
/// assert_eq!(table.interpolated_scale(0.3), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeTable {
    radii: [f32; RANGE_TABLE_SIZE],
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl RangeTable {
    /// Creates a table with no calibration data.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            radii: [0.0; RANGE_TABLE_SIZE],
        }
    }

    /// Builds a table from persisted entries.
    ///
    /// Only the first `count` entries are used. Entries that are not strictly
    /// positive (or not finite) become "no data".
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_stick::analog::range::RangeTable;
    ///
    /// let table = RangeTable::from_entries(&[1.0, -2.0, 0.9], 2);
    /// assert_eq!(table.radius(0), 1.0);
    /// assert_eq!(table.radius(1), 0.0);
    /// assert_eq!(table.radius(2), 0.0);
    /// ```
    #[must_use]
    pub fn from_entries(entries: &[f32], count: usize) -> Self {
        let mut radii = [0.0; RANGE_TABLE_SIZE];
        for (slot, &value) in radii.iter_mut().zip(entries.iter().take(count)) {
            if value.is_finite() && value > 0.0 {
                *slot = value;
            }
        }
        Self { radii }
    }

    /// Returns the stored ratio of one bucket (0.0 = no data).
    ///
    /// # Panics
    ///
    /// Panics if `index >= RANGE_TABLE_SIZE`.
    #[must_use]
    pub fn radius(&self, index: usize) -> f32 {
        self.radii[index]
    }

    /// Returns all buckets.
    #[must_use]
    pub fn radii(&self) -> &[f32; RANGE_TABLE_SIZE] {
        &self.radii
    }

    /// Returns `true` if any bucket holds calibration data.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.radii.iter().any(|&r| r > 0.0)
    }

    /// Interpolates the radius ratio at `angle` (radians, -π..=π).
    ///
    /// Returns `0.0` when the table is empty, meaning "pass through unscaled".
    #[must_use]
    pub fn interpolated_scale(&self, angle: f32) -> f32 {
        if !self.has_data() {
            return 0.0;
        }

        let index = (angle + PI) / (2.0 * PI) * RANGE_TABLE_SIZE as f32;
        let floor = index.floor();
        let t = index - floor;

        let i0 = (floor as i64).rem_euclid(RANGE_TABLE_SIZE as i64) as usize;
        let i1 = (i0 + 1) % RANGE_TABLE_SIZE;

        self.radii[i0] * (1.0 - t) + self.radii[i1] * t
    }

    /// Projects a center-relative sample onto the ideal circle.
    ///
    /// Returns the (possibly unchanged) pair and whether scaling was applied.
    #[must_use]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32, bool) {
        let distance = x.hypot(y);
        let scale = self.interpolated_scale(y.atan2(x));

        if scale > 0.0 && distance > 0.0 {
            (x / scale, y / scale, true)
        } else {
            (x, y, false)
        }
    }
}

/// Builds a [`RangeTable`] from samples taken while rotating a stick along its gate.
///
/// Samples are center-relative ADC values. Only samples beyond
/// [`EXTREME_THRESHOLD`] of the ideal radius are recorded; each bucket keeps
/// its maximum.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::range::{RangeRecorder, RANGE_TABLE_SIZE};
///
/// let mut recorder = RangeRecorder::new();
/// for i in 0..RANGE_TABLE_SIZE {
///     let angle = -std::f32::consts::PI + i as f32 * std::f32::consts::TAU / RANGE_TABLE_SIZE as f32;
///     recorder.record(angle.cos() * 2047.0, angle.sin() * 2047.0);
/// }
/// assert_eq!(recorder.full_cycles(), 1);
/// assert!(recorder.finish().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RangeRecorder {
    max_radii: [f32; RANGE_TABLE_SIZE],
    cycle_radii: [f32; RANGE_TABLE_SIZE],
    full_cycles: u32,
}

impl Default for RangeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_radii: [0.0; RANGE_TABLE_SIZE],
            cycle_radii: [0.0; RANGE_TABLE_SIZE],
            full_cycles: 0,
        }
    }

    /// Records one center-relative sample.
    pub fn record(&mut self, x: f32, y: f32) {
        let nx = x / ADC_CENTER;
        let ny = y / ADC_CENTER;
        let distance = nx.hypot(ny);

        if distance > EXTREME_THRESHOLD {
            let angle = ny.atan2(nx);
            let bucket = ((angle + PI) * RANGE_TABLE_SIZE as f32 / (2.0 * PI)).round() as usize
                % RANGE_TABLE_SIZE;

            if distance > self.cycle_radii[bucket] {
                self.cycle_radii[bucket] = distance;
                if distance > self.max_radii[bucket] {
                    self.max_radii[bucket] = distance;
                }
            }
        }

        if self.cycle_fill_ratio() >= CYCLE_FILL_THRESHOLD {
            self.full_cycles += 1;
            self.cycle_radii = [0.0; RANGE_TABLE_SIZE];
        }
    }

    /// Number of completed rotations.
    #[must_use]
    pub fn full_cycles(&self) -> u32 {
        self.full_cycles
    }

    /// Fraction of buckets filled during the current rotation.
    #[must_use]
    pub fn cycle_fill_ratio(&self) -> f32 {
        let filled = self
            .cycle_radii
            .iter()
            .filter(|&&r| r > EXTREME_THRESHOLD)
            .count();
        filled as f32 / RANGE_TABLE_SIZE as f32
    }

    /// Overall progress toward [`REQUIRED_FULL_CYCLES`] rotations (0.0 to 1.0).
    #[must_use]
    pub fn progress(&self) -> f32 {
        let cycles = REQUIRED_FULL_CYCLES as f32;
        let done = self.full_cycles as f32 / cycles;
        let current = self.cycle_fill_ratio() / cycles;
        (done + current).min(1.0)
    }

    /// Finishes recording.
    ///
    /// Returns `None` if not even one rotation was captured, which callers
    /// treat as a cancelled calibration.
    #[must_use]
    pub fn finish(self) -> Option<RangeTable> {
        if self.full_cycles >= 1 || self.cycle_fill_ratio() >= CYCLE_FILL_THRESHOLD {
            Some(RangeTable::from_entries(&self.max_radii, RANGE_TABLE_SIZE))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKET_WIDTH: f32 = 2.0 * PI / RANGE_TABLE_SIZE as f32;

    fn bucket_angle(index: usize) -> f32 {
        -PI + index as f32 * BUCKET_WIDTH
    }

    fn uniform_table(value: f32) -> RangeTable {
        RangeTable::from_entries(&[value; RANGE_TABLE_SIZE], RANGE_TABLE_SIZE)
    }

    // ==================== RangeTable Construction Tests ====================

    #[test]
    fn test_empty_table_has_no_data() {
        let table = RangeTable::empty();
        assert!(!table.has_data());
        assert_eq!(table, RangeTable::default());
    }

    #[test]
    fn test_from_entries_respects_count() {
        let table = RangeTable::from_entries(&[1.1; RANGE_TABLE_SIZE], 10);
        assert_eq!(table.radius(9), 1.1);
        assert_eq!(table.radius(10), 0.0);
    }

    #[test]
    fn test_from_entries_drops_invalid_values() {
        let table = RangeTable::from_entries(&[0.0, -1.0, f32::NAN, f32::INFINITY, 1.2], 5);
        assert_eq!(table.radius(0), 0.0);
        assert_eq!(table.radius(1), 0.0);
        assert_eq!(table.radius(2), 0.0);
        assert_eq!(table.radius(3), 0.0);
        assert_eq!(table.radius(4), 1.2);
    }

    #[test]
    fn test_from_entries_short_slice() {
        let table = RangeTable::from_entries(&[1.0, 1.0], RANGE_TABLE_SIZE);
        assert!(table.has_data());
        assert_eq!(table.radius(47), 0.0);
    }

    // ==================== Interpolation Tests ====================

    #[test]
    fn test_empty_table_returns_no_scale() {
        let table = RangeTable::empty();
        for i in 0..100 {
            let angle = -PI + i as f32 * (2.0 * PI / 100.0);
            assert_eq!(table.interpolated_scale(angle), 0.0);
        }
    }

    #[test]
    fn test_uniform_table_is_constant() {
        let table = uniform_table(1.2);
        for i in 0..100 {
            let angle = -PI + i as f32 * (2.0 * PI / 100.0);
            assert!((table.interpolated_scale(angle) - 1.2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_bucket_boundary_selects_bucket() {
        let mut entries = [0.0; RANGE_TABLE_SIZE];
        entries[12] = 1.0;
        entries[13] = 2.0;
        let table = RangeTable::from_entries(&entries, RANGE_TABLE_SIZE);

        // -π/2 lands exactly on bucket 12
        assert!((table.interpolated_scale(-PI / 2.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_interpolates_between_neighbors() {
        let mut entries = [1.0; RANGE_TABLE_SIZE];
        entries[12] = 1.0;
        entries[13] = 2.0;
        let table = RangeTable::from_entries(&entries, RANGE_TABLE_SIZE);

        let midway = bucket_angle(12) + BUCKET_WIDTH / 2.0;
        assert!((table.interpolated_scale(midway) - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_wraparound_endpoints_select_bucket_zero() {
        let mut entries = [1.0; RANGE_TABLE_SIZE];
        entries[0] = 1.3;
        let table = RangeTable::from_entries(&entries, RANGE_TABLE_SIZE);

        assert!((table.interpolated_scale(-PI) - 1.3).abs() < 1e-5);
        assert!((table.interpolated_scale(PI) - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_single_bucket_is_continuous_across_wraparound() {
        let mut entries = [0.0; RANGE_TABLE_SIZE];
        entries[0] = 1.0;
        let table = RangeTable::from_entries(&entries, RANGE_TABLE_SIZE);

        // Walk from inside bucket 47 up to π and from -π into bucket 0.
        let steps = 200;
        let mut previous = table.interpolated_scale(PI - BUCKET_WIDTH);
        for i in 1..=steps {
            let angle = PI - BUCKET_WIDTH + i as f32 * (BUCKET_WIDTH / steps as f32);
            let value = table.interpolated_scale(angle);
            assert!((value - previous).abs() < 0.02, "jump at angle {}", angle);
            previous = value;
        }

        let at_pi = table.interpolated_scale(PI);
        let at_neg_pi = table.interpolated_scale(-PI);
        assert!((at_pi - at_neg_pi).abs() < 1e-4);

        let mut previous = at_neg_pi;
        for i in 1..=steps {
            let angle = -PI + i as f32 * (BUCKET_WIDTH / steps as f32);
            let value = table.interpolated_scale(angle);
            assert!((value - previous).abs() < 0.02, "jump at angle {}", angle);
            previous = value;
        }
    }

    // ==================== Apply Tests ====================

    #[test]
    fn test_apply_without_data_passes_through() {
        let table = RangeTable::empty();
        assert_eq!(table.apply(100.0, -50.0), (100.0, -50.0, false));
    }

    #[test]
    fn test_apply_at_origin_passes_through() {
        let table = uniform_table(1.2);
        assert_eq!(table.apply(0.0, 0.0), (0.0, 0.0, false));
    }

    #[test]
    fn test_apply_divides_by_scale() {
        let table = uniform_table(0.8);
        let (x, y, scaled) = table.apply(1638.0, 0.0);
        assert!(scaled);
        assert!((x - 2047.5).abs() < 0.01);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_apply_square_gate_diagonal() {
        // Square gate corners reach √2 further than the ideal circle.
        let table = uniform_table(std::f32::consts::SQRT_2);
        let corner = 2047.5;
        let (x, y, _) = table.apply(corner, corner);
        assert!((x.hypot(y) - 2047.5).abs() < 0.1);
    }

    // ==================== RangeRecorder Tests ====================

    fn sweep(recorder: &mut RangeRecorder, radius: f32) {
        for i in 0..RANGE_TABLE_SIZE {
            let angle = bucket_angle(i);
            recorder.record(angle.cos() * radius, angle.sin() * radius);
        }
    }

    #[test]
    fn test_recorder_ignores_samples_inside_threshold() {
        let mut recorder = RangeRecorder::new();
        sweep(&mut recorder, 1000.0);
        assert_eq!(recorder.full_cycles(), 0);
        assert_eq!(recorder.cycle_fill_ratio(), 0.0);
        assert!(recorder.finish().is_none());
    }

    #[test]
    fn test_recorder_full_rotation_completes_cycle() {
        let mut recorder = RangeRecorder::new();
        sweep(&mut recorder, 2047.5);
        assert_eq!(recorder.full_cycles(), 1);

        // The last buckets of the sweep already count toward the next rotation.
        let progress = recorder.progress();
        assert!(progress >= 0.25 && progress < 0.5);
    }

    #[test]
    fn test_recorder_progress_caps_at_one() {
        let mut recorder = RangeRecorder::new();
        for _ in 0..6 {
            sweep(&mut recorder, 2047.5);
        }
        assert_eq!(recorder.full_cycles(), 6);
        assert_eq!(recorder.progress(), 1.0);
    }

    #[test]
    fn test_recorder_keeps_maximum_across_cycles() {
        let mut recorder = RangeRecorder::new();
        sweep(&mut recorder, 2200.0);
        sweep(&mut recorder, 2047.5);

        let table = recorder.finish().unwrap();
        let expected = 2200.0 / ADC_CENTER;
        for i in 0..RANGE_TABLE_SIZE {
            assert!((table.radius(i) - expected).abs() < 1e-3, "bucket {}", i);
        }
    }

    #[test]
    fn test_recorder_partial_rotation_is_cancelled() {
        let mut recorder = RangeRecorder::new();
        for i in 0..RANGE_TABLE_SIZE / 2 {
            let angle = bucket_angle(i);
            recorder.record(angle.cos() * 2047.5, angle.sin() * 2047.5);
        }
        assert!(recorder.progress() > 0.0);
        assert!(recorder.finish().is_none());
    }
}
