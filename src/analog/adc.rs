//! # Sample Acquisition
//!
//! Reads raw 12-bit samples from the ADC channels wired to the sticks.
//!
//! ## Pin Assignment
//!
//! | GPIO | ADC Channel |
//! |------|-------------|
//! | 26 | 0 |
//! | 27 | 1 |
//! | 28 | 2 |
//! | 29 | 3 |
//!
//! Any other pin, including the unassigned value `-1`, is treated as absent:
//! no read is attempted and the axis stays centered.
//!
//! ## Backends
//!
//! The [`AdcReader`] trait is the hardware seam. [`IioAdc`] implements it on
//! top of the Linux Industrial I/O sysfs interface.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AnalogError, Result};

/// Largest raw sample a 12-bit ADC can produce.
pub const ADC_MAX: u16 = (1 << 12) - 1;

/// Theoretical midpoint of the raw ADC range (2047.5).
pub const ADC_CENTER: f32 = ADC_MAX as f32 / 2.0;

/// First GPIO pin that is routed to the ADC.
pub const ADC_PIN_OFFSET: i32 = 26;

/// Number of ADC-capable pins.
pub const ADC_CHANNEL_COUNT: i32 = 4;

/// Pin value meaning "not assigned".
pub const PIN_UNASSIGNED: i32 = -1;

/// Hardware ADC primitive: select a channel, then read one 12-bit sample.
///
/// Reads are expected to be short busy-wait operations. Implementations must
/// never fail; a missing sensor reads as 0.
#[cfg_attr(test, mockall::automock)]
pub trait AdcReader {
    /// Routes the ADC multiplexer to `channel` (0-3).
    fn select_input(&mut self, channel: u8);

    /// Returns the most recent sample from the selected channel.
    fn read(&mut self) -> u16;
}

/// Maps a GPIO pin to its ADC channel.
///
/// # Examples
///
/// ```
/// use analog_stick::analog::adc::adc_channel;
///
/// assert_eq!(adc_channel(26), Some(0));
/// assert_eq!(adc_channel(29), Some(3));
/// assert_eq!(adc_channel(-1), None);
/// assert_eq!(adc_channel(15), None);
/// ```
#[must_use]
pub fn adc_channel(pin: i32) -> Option<u8> {
    let channel = pin - ADC_PIN_OFFSET;
    if (0..ADC_CHANNEL_COUNT).contains(&channel) {
        Some(channel as u8)
    } else {
        None
    }
}

/// Returns `true` if `pin` is an ADC-capable pin.
#[must_use]
pub fn is_valid_pin(pin: i32) -> bool {
    adc_channel(pin).is_some()
}

/// Reads one raw sample from `pin`.
///
/// Returns `None` when the pin is absent. Samples above [`ADC_MAX`] are clamped.
pub fn read_pin<A: AdcReader + ?Sized>(adc: &mut A, pin: i32) -> Option<u16> {
    let channel = adc_channel(pin)?;
    adc.select_input(channel);
    Some(adc.read().min(ADC_MAX))
}

/// ADC backed by a Linux IIO device (`/sys/bus/iio/devices/iio:deviceN`).
#[derive(Debug)]
pub struct IioAdc {
    device_path: PathBuf,
    channel: u8,
}

impl IioAdc {
    /// Opens an IIO device directory.
    ///
    /// # Errors
    ///
    /// Returns [`AnalogError::Adc`] if the directory does not exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_stick::analog::adc::IioAdc;
    ///
    /// let adc = IioAdc::open("/sys/bus/iio/devices/iio:device0")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(device_path: P) -> Result<Self> {
        let device_path = device_path.as_ref().to_path_buf();
        if !device_path.is_dir() {
            return Err(AnalogError::Adc(format!(
                "IIO device not found at {}",
                device_path.display()
            )));
        }

        info!("Opened IIO ADC at {}", device_path.display());
        Ok(Self {
            device_path,
            channel: 0,
        })
    }

    /// Returns the device directory.
    #[must_use]
    pub fn device_path(&self) -> &Path {
        &self.device_path
    }

    fn channel_path(&self) -> PathBuf {
        self.device_path
            .join(format!("in_voltage{}_raw", self.channel))
    }
}

impl AdcReader for IioAdc {
    fn select_input(&mut self, channel: u8) {
        self.channel = channel;
    }

    fn read(&mut self) -> u16 {
        let path = self.channel_path();
        match fs::read_to_string(&path) {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(value) => value.min(u32::from(ADC_MAX)) as u16,
                Err(e) => {
                    debug!("Unparseable sample in {}: {}", path.display(), e);
                    0
                }
            },
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                0
            }
        }
    }
}
