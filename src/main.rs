//! # Analog Stick Daemon
//!
//! Samples the analog sticks of a controller board through a Linux IIO ADC
//! and runs them through the signal conditioning pipeline.
//!
//! Usage: `analog-stick [config.toml]`

use anyhow::{Context, Result};
use std::env;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use analog_stick::analog::adc::IioAdc;
use analog_stick::analog::{AnalogInput, GamepadState, JoystickRange};
use analog_stick::config::{Config, LoggingConfig};
use analog_stick::options::store::{FileOptionsStore, OptionsStore};

/// Configuration file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Log file name prefix inside the configured log directory
const LOG_FILE_PREFIX: &str = "analog-stick.log";

/// Main entry point for the analog stick daemon
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load the daemon configuration and set up logging
///    - Load persisted analog options and start the persistence worker
///    - Configure both sticks and open the ADC device
///
/// 2. **Main Loop**
///    - Run one pipeline cycle per sampling tick
///    - Log the gamepad axes every `log_interval_cycles`
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Flush pending option saves
///    - Log total cycle count
///
/// # Errors
///
/// Returns error if:
/// - Configuration or options file cannot be loaded
/// - ADC device cannot be opened
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _log_guard = init_logging(&config.logging);

    info!("Analog Stick v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from {}", config_path);

    let store = FileOptionsStore::open(&config.options.path).with_context(|| {
        format!("Failed to load analog options from {}", config.options.path.display())
    })?;

    if !AnalogInput::available(store.analog_options()) {
        warn!("Analog input disabled in {}, exiting", store.path().display());
        store.shutdown().await;
        return Ok(());
    }

    let mut input = AnalogInput::setup(store.analog_options());
    let mut adc = IioAdc::open(&config.adc.device_path)?;

    let driver = config.output.active_driver();
    let range = JoystickRange::for_driver(driver.as_ref());
    let mut gamepad = GamepadState::centered(&range);

    let mut sample_interval = interval(sample_period(config.sampling.rate_hz));
    sample_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Starting sampling loop at {}Hz (joystick mid {:#x}, max {:#x})",
        config.sampling.rate_hz, range.mid, range.max
    );
    info!("Press Ctrl+C to exit");

    let mut cycle_count: u64 = 0;

    // Main sampling loop
    loop {
        tokio::select! {
            _ = sample_interval.tick() => {
                input.process(&mut adc, &mut gamepad, driver.as_ref());
                cycle_count += 1;

                if cycle_count % config.sampling.log_interval_cycles == 0 {
                    let [stick1, stick2] = input.sticks();
                    info!(
                        "Cycle {}: left ({:#06x}, {:#06x}) right ({:#06x}, {:#06x}) magnitude ({:.3}, {:.3})",
                        cycle_count,
                        gamepad.lx,
                        gamepad.ly,
                        gamepad.rx,
                        gamepad.ry,
                        stick1.state.scaled_magnitude(stick1.config.error_rate),
                        stick2.state.scaled_magnitude(stick2.config.error_rate)
                    );
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total cycles: {}", cycle_count);
                break;
            }
        }
    }

    store.shutdown().await;
    Ok(())
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. The returned guard must live
/// until exit so buffered file output is flushed.
fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let (file_layer, guard) = match &logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Interval between sampling cycles.
fn sample_period(rate_hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_period_default_rate() {
        assert_eq!(sample_period(1000), Duration::from_millis(1));
    }

    #[test]
    fn test_sample_period_bounds() {
        assert_eq!(sample_period(1), Duration::from_secs(1));
        assert_eq!(sample_period(10000), Duration::from_micros(100));
        // Zero is rejected by config validation; never divide by it
        assert_eq!(sample_period(0), Duration::from_secs(1));
    }

    #[test]
    fn test_default_config_path() {
        assert!(DEFAULT_CONFIG_PATH.ends_with(".toml"));
    }
}
