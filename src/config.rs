//! Runtime configuration.
//!
//! Loaded from TOML. Every section and field is optional and falls back to
//! the values of a typical convertible (two IIO accelerometers under
//! `/sys/bus/iio/devices`, polled once per second).
//!
//! ```toml
//! [sensors]
//! iio_root = "/sys/bus/iio/devices"
//! touchscreen = "iio:device0"
//! keyboard = "iio:device1"
//!
//! [filter]
//! alpha = 0.1
//!
//! [monitor]
//! poll_interval_ms = 1000
//! detectors = ["folded", "threshold"]
//! require_lid_open_for_fold = true
//! lid_state_path = "/proc/acpi/button/lid/LID0/state"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classifier::DetectorKind;
use crate::error::{Result, SensingError};
use crate::policy::DetectionPolicy;
use crate::signal::{FilterConfig, DEFAULT_FILTER_ALPHA};

/// Default sysfs directory holding IIO devices.
pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Where the accelerometers are found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Directory containing the IIO device directories.
    pub iio_root: PathBuf,
    /// IIO device name of the display accelerometer.
    pub touchscreen: String,
    /// IIO device name of the base accelerometer.
    pub keyboard: String,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            iio_root: PathBuf::from(DEFAULT_IIO_ROOT),
            touchscreen: "iio:device0".to_string(),
            keyboard: "iio:device1".to_string(),
        }
    }
}

/// Smoothing applied to recorded streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    pub alpha: f64,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_FILTER_ALPHA,
        }
    }
}

/// Live monitoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between two polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Detectors OR-ed together, in evaluation order.
    pub detectors: Vec<DetectorKind>,
    /// Ignore the folded detector while the lid is closed.
    pub require_lid_open_for_fold: bool,
    /// ACPI lid state file. Without it the lid is assumed open.
    pub lid_state_path: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            detectors: vec![DetectorKind::Folded, DetectorKind::Threshold],
            require_lid_open_for_fold: true,
            lid_state_path: None,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn policy(&self) -> Result<DetectionPolicy> {
        DetectionPolicy::new(&self.detectors, self.require_lid_open_for_fold)
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingConfig {
    pub sensors: SensorConfig,
    pub filter: FilterSection,
    pub monitor: MonitorConfig,
}

impl SensingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SensingConfig =
            toml::from_str(text).map_err(|e| SensingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SensingError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SensingError::Config(e.to_string()))
    }

    /// Reject values the core cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.sensors.touchscreen.is_empty() || self.sensors.keyboard.is_empty() {
            return Err(SensingError::Config(
                "sensor device names must not be empty".to_string(),
            ));
        }
        if self.sensors.touchscreen == self.sensors.keyboard {
            return Err(SensingError::Config(format!(
                "touchscreen and keyboard must be different devices, both are {:?}",
                self.sensors.touchscreen
            )));
        }
        self.filter_config()?;
        if self.monitor.poll_interval_ms == 0 {
            return Err(SensingError::Config(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        self.monitor.policy()?;
        Ok(())
    }

    /// Validated filter parameters of the `[filter]` section.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        FilterConfig::new(self.filter.alpha)
    }
}
