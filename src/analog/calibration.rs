//! # Calibration Capture
//!
//! Raw-read and save primitives used by the interactive calibration flows,
//! plus the center calibration wizard that drives them.
//!
//! While a wizard runs, input is read here instead of through the pipeline.
//! Every save writes into the options store and requests a fire-and-forget
//! persist. New values only take effect once the analog subsystem is set up
//! again, which is why a completed wizard asks for a restart.
//!
//! ## Wizard Steps
//!
//! ```text
//! Stick 1: TopLeft → TopRight → BottomLeft → BottomRight
//! Stick 2: TopLeft → TopRight → BottomLeft → BottomRight
//!        → Complete ──confirm──▶ save + restart
//!
//! cancel (any step) ──▶ discard, nothing saved
//! ```

use tracing::{info, warn};

use super::adc::{read_pin, AdcReader};
use super::range::{RangeTable, RANGE_TABLE_SIZE};
use crate::options::store::OptionsStore;
use crate::options::{AnalogOptions, STICK_COUNT};

/// Largest inner or anti deadzone the tuning flow stores, percent.
pub const DEADZONE_TUNING_MAX: u32 = 10;

/// Error rates (per mille) selectable in the tuning flow, by step 0 to 10.
pub const ERROR_RATE_STEPS: [u32; 11] = [1000, 990, 979, 969, 958, 946, 934, 922, 911, 900, 890];

/// Number of corner captures per stick.
pub const CORNERS_PER_STICK: usize = 4;

/// Reads one raw sample pair from a stick, bypassing the pipeline.
///
/// Returns `None` if the analog subsystem is disabled or `stick` does not
/// exist. An absent axis reads as 0.
pub fn read_joystick_adc<A: AdcReader + ?Sized>(
    adc: &mut A,
    options: &AnalogOptions,
    stick: usize,
) -> Option<(u16, u16)> {
    if !options.enabled {
        return None;
    }
    let stick = options.stick(stick)?;

    let x = read_pin(adc, stick.pin_x).unwrap_or(0);
    let y = read_pin(adc, stick.pin_y).unwrap_or(0);
    Some((x, y))
}

/// Averages four corner captures laid out as `[x1, y1, x2, y2, x3, y3, x4, y4]`.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::calibration::calculate_calibration_center;
///
/// let center = calculate_calibration_center(&[0, 0, 100, 100, 0, 100, 100, 0]);
/// assert_eq!(center, (50, 50));
/// ```
#[must_use]
pub fn calculate_calibration_center(values: &[u16; CORNERS_PER_STICK * 2]) -> (u32, u32) {
    let sum_x: u32 = values.iter().step_by(2).map(|&v| u32::from(v)).sum();
    let sum_y: u32 = values.iter().skip(1).step_by(2).map(|&v| u32::from(v)).sum();
    (
        sum_x / CORNERS_PER_STICK as u32,
        sum_y / CORNERS_PER_STICK as u32,
    )
}

/// Stores both sticks' centers and requests a save.
pub fn save_calibration_values<S: OptionsStore + ?Sized>(
    store: &mut S,
    stick1: (u32, u32),
    stick2: (u32, u32),
) {
    let options = store.analog_options_mut();
    options.stick1.center_x = stick1.0;
    options.stick1.center_y = stick1.1;
    options.stick2.center_x = stick2.0;
    options.stick2.center_y = stick2.1;

    info!(
        "Saving stick centers ({}, {}) and ({}, {})",
        stick1.0, stick1.1, stick2.0, stick2.1
    );
    store.request_save();
}

/// Stores one stick's deadzone percentages and error rate, then requests a save.
///
/// Deadzones above [`DEADZONE_TUNING_MAX`] are clamped. `error_step` selects an
/// entry of [`ERROR_RATE_STEPS`] and is clamped the same way. Returns `false`
/// if `stick` does not exist.
pub fn save_deadzone_values<S: OptionsStore + ?Sized>(
    store: &mut S,
    stick: usize,
    inner: u32,
    anti: u32,
    error_step: u32,
) -> bool {
    let Some(options) = store.analog_options_mut().stick_mut(stick) else {
        warn!("Cannot save deadzone for unknown stick {}", stick);
        return false;
    };

    options.inner_deadzone = inner.min(DEADZONE_TUNING_MAX);
    options.anti_deadzone = anti.min(DEADZONE_TUNING_MAX);
    options.error_rate = error_rate_for_step(error_step);
    info!(
        "Saving stick {} deadzone: inner {}%, anti {}%, error rate {}",
        stick + 1,
        options.inner_deadzone,
        options.anti_deadzone,
        options.error_rate
    );

    store.request_save();
    true
}

/// Error rate (per mille) stored for a tuning step. Steps above the table are clamped.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::calibration::error_rate_for_step;
///
/// assert_eq!(error_rate_for_step(0), 1000);
/// assert_eq!(error_rate_for_step(10), 890);
/// assert_eq!(error_rate_for_step(42), 890);
/// ```
#[must_use]
pub fn error_rate_for_step(step: u32) -> u32 {
    let index = (step as usize).min(ERROR_RATE_STEPS.len() - 1);
    ERROR_RATE_STEPS[index]
}

/// Tuning step whose error rate is nearest to `error_rate`. Ties go to the lower step.
#[must_use]
pub fn error_step_for_rate(error_rate: u32) -> u32 {
    let mut best = 0;
    for (step, &rate) in ERROR_RATE_STEPS.iter().enumerate() {
        if rate.abs_diff(error_rate) < ERROR_RATE_STEPS[best].abs_diff(error_rate) {
            best = step;
        }
    }
    best as u32
}

/// Stores a recorded range table for one stick and requests a save.
///
/// Returns `false` if `stick` does not exist.
pub fn save_range_calibration<S: OptionsStore + ?Sized>(
    store: &mut S,
    stick: usize,
    table: &RangeTable,
) -> bool {
    let Some(options) = store.analog_options_mut().stick_mut(stick) else {
        warn!("Cannot save range calibration for unknown stick {}", stick);
        return false;
    };

    options.range_data = table.radii().to_vec();
    options.range_data_count = RANGE_TABLE_SIZE;
    info!("Saving stick {} range calibration", stick + 1);

    store.request_save();
    true
}

/// Physical extreme captured by one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Capture order within one stick.
    pub const ORDER: [Corner; CORNERS_PER_STICK] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Waiting for the user to hold `stick` (0 or 1) at `corner`.
    Capturing { stick: usize, corner: Corner },
    /// All corners captured; waiting for confirm or cancel.
    Complete,
}

/// Returned by [`CalibrationWizard::confirm`]: the device must restart to load
/// the new centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RestartRequest;

/// Center calibration wizard for both sticks.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::calibration::{CalibrationWizard, WizardState};
///
/// let mut wizard = CalibrationWizard::new();
/// for (x, y) in [(0, 0), (100, 0), (0, 100), (100, 100)] {
///     wizard.capture(x, y);
/// }
/// for _ in 0..4 {
///     wizard.capture(2048, 2048);
/// }
/// assert_eq!(wizard.state(), WizardState::Complete);
/// assert_eq!(wizard.centers(), Some(((50, 50), (2048, 2048))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalibrationWizard {
    step: usize,
    samples: [[u16; CORNERS_PER_STICK * 2]; STICK_COUNT],
}

impl CalibrationWizard {
    const TOTAL_STEPS: usize = CORNERS_PER_STICK * STICK_COUNT;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> WizardState {
        if self.step >= Self::TOTAL_STEPS {
            WizardState::Complete
        } else {
            WizardState::Capturing {
                stick: self.step / CORNERS_PER_STICK,
                corner: Corner::ORDER[self.step % CORNERS_PER_STICK],
            }
        }
    }

    /// Stores a sample for the current step and advances.
    ///
    /// Ignored once complete.
    pub fn capture(&mut self, x: u16, y: u16) -> WizardState {
        if let WizardState::Capturing { stick, .. } = self.state() {
            let slot = (self.step % CORNERS_PER_STICK) * 2;
            self.samples[stick][slot] = x;
            self.samples[stick][slot + 1] = y;
            self.step += 1;
        }
        self.state()
    }

    /// Reads the current step's stick and captures the result.
    ///
    /// A failed read captures `(0, 0)`.
    pub fn capture_from<A: AdcReader + ?Sized>(
        &mut self,
        adc: &mut A,
        options: &AnalogOptions,
    ) -> WizardState {
        match self.state() {
            WizardState::Capturing { stick, .. } => {
                let (x, y) = read_joystick_adc(adc, options, stick).unwrap_or((0, 0));
                self.capture(x, y)
            }
            WizardState::Complete => WizardState::Complete,
        }
    }

    /// Averaged centers of both sticks, once every corner is captured.
    #[must_use]
    pub fn centers(&self) -> Option<((u32, u32), (u32, u32))> {
        match self.state() {
            WizardState::Complete => Some((
                calculate_calibration_center(&self.samples[0]),
                calculate_calibration_center(&self.samples[1]),
            )),
            WizardState::Capturing { .. } => None,
        }
    }

    /// Saves the averaged centers and asks for a restart.
    ///
    /// Returns `None` without touching the store if capture is unfinished.
    pub fn confirm<S: OptionsStore + ?Sized>(self, store: &mut S) -> Option<RestartRequest> {
        let (stick1, stick2) = self.centers()?;
        save_calibration_values(store, stick1, stick2);
        Some(RestartRequest)
    }

    /// Discards all captured samples.
    pub fn cancel(self) {
        info!("Calibration cancelled at step {}", self.step + 1);
    }
}
