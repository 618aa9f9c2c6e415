//! # Configuration Module
//!
//! Handles loading and validating the daemon configuration from TOML files.
//!
//! This covers where samples come from and how the daemon runs. Per-stick
//! calibration and tuning live in the persisted options file, see
//! [`crate::options`].

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analog::output::{ActiveDriver, DEFAULT_JOYSTICK_MID};
use crate::error::{AnalogError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub adc: AdcConfig,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ADC device configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AdcConfig {
    #[serde(default = "default_device_path")]
    pub device_path: PathBuf,
}

/// Sampling loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SamplingConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    /// Cycles between diagnostic log lines.
    #[serde(default = "default_log_interval_cycles")]
    pub log_interval_cycles: u64,
}

/// Output driver configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Joystick midpoint of the active driver. Unset means no driver is active.
    #[serde(default)]
    pub joystick_mid: Option<u32>,
}

/// Persisted options location
#[derive(Debug, Deserialize, Clone)]
pub struct OptionsConfig {
    #[serde(default = "default_options_path")]
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files. Unset logs to stdout only.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// Default value functions
fn default_device_path() -> PathBuf { PathBuf::from("/sys/bus/iio/devices/iio:device0") }

fn default_rate_hz() -> u32 { 1000 }
fn default_log_interval_cycles() -> u64 { 1000 }

fn default_options_path() -> PathBuf { PathBuf::from("/var/lib/analog-stick/options.toml") }

fn default_log_level() -> String { "info".to_string() }

impl Default for AdcConfig {
    fn default() -> Self {
        Self { device_path: default_device_path() }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            log_interval_cycles: default_log_interval_cycles(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self { path: default_options_path() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl OutputConfig {
    /// Active output driver, if one is configured.
    #[must_use]
    pub fn active_driver(&self) -> Option<ActiveDriver> {
        self.joystick_mid.map(|joystick_mid| ActiveDriver { joystick_mid })
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_stick::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.adc.device_path.as_os_str().is_empty() {
            return Err(invalid("adc device_path cannot be empty"));
        }

        if self.sampling.rate_hz == 0 || self.sampling.rate_hz > 10000 {
            return Err(invalid("rate_hz must be between 1 and 10000"));
        }

        if self.sampling.log_interval_cycles == 0 {
            return Err(invalid("log_interval_cycles must be greater than 0"));
        }

        if let Some(mid) = self.output.joystick_mid {
            if mid == 0 || mid > DEFAULT_JOYSTICK_MID {
                return Err(invalid(format!(
                    "joystick_mid must be between 1 and {:#x}",
                    DEFAULT_JOYSTICK_MID
                )));
            }
        }

        if self.options.path.as_os_str().is_empty() {
            return Err(invalid("options path cannot be empty"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging level cannot be empty"));
        }

        Ok(())
    }
}

fn invalid<T: std::fmt::Display>(msg: T) -> AnalogError {
    AnalogError::Config(toml::de::Error::custom(msg))
}
