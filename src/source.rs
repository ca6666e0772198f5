//! Sensor sources: where raw readings come from.
//!
//! The core only needs three signed integers per device and poll. This
//! module defines that contract and provides:
//! - `SysfsSource`: Linux IIO devices under an injected sysfs root
//! - `ReplaySource`: recorded readings, for tests and offline runs
//! - `LidSensor` implementations gating the folded-screen detector
//!
//! Sources never enumerate devices; the device names are configuration.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::SensorConfig;
use crate::error::{Result, SensingError};
use crate::types::{Axis, Device, DualSample, RawVector};

/// Supplies raw accelerometer readings on demand.
pub trait SensorSource {
    /// One raw reading of `device`.
    fn read(&mut self, device: Device) -> Result<RawVector>;

    /// One reading of each device, touchscreen first.
    fn read_pair(&mut self) -> Result<DualSample<i32>> {
        let touchscreen = self.read(Device::Touchscreen)?;
        let keyboard = self.read(Device::Keyboard)?;
        Ok(DualSample::new(touchscreen, keyboard))
    }
}

/// Reads `in_accel_{x,y,z}_raw` attributes of two IIO devices.
#[derive(Debug, Clone)]
pub struct SysfsSource {
    root: PathBuf,
    touchscreen: String,
    keyboard: String,
}

impl SysfsSource {
    pub fn new(root: impl Into<PathBuf>, touchscreen: &str, keyboard: &str) -> Self {
        Self {
            root: root.into(),
            touchscreen: touchscreen.to_string(),
            keyboard: keyboard.to_string(),
        }
    }

    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(&config.iio_root, &config.touchscreen, &config.keyboard)
    }

    /// Directory of the IIO device bound to `device`.
    pub fn device_dir(&self, device: Device) -> PathBuf {
        let name = match device {
            Device::Touchscreen => &self.touchscreen,
            Device::Keyboard => &self.keyboard,
        };
        self.root.join(name)
    }

    fn read_axis(&self, device: Device, axis: Axis) -> Result<i32> {
        let path = self
            .device_dir(device)
            .join(format!("in_accel_{}_raw", axis));
        let text = fs::read_to_string(&path).map_err(|e| SensingError::io(&path, e))?;
        parse_axis(device, axis, &text)
    }
}

/// Parse one sysfs attribute. Empty or non-numeric content is malformed.
pub(crate) fn parse_axis(device: Device, axis: Axis, text: &str) -> Result<i32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SensingError::MalformedSample {
            device,
            axis,
            reason: "empty reading".to_string(),
        });
    }
    trimmed
        .parse::<i32>()
        .map_err(|e| SensingError::MalformedSample {
            device,
            axis,
            reason: format!("{trimmed:?}: {e}"),
        })
}

impl SensorSource for SysfsSource {
    fn read(&mut self, device: Device) -> Result<RawVector> {
        let reading = RawVector::new(
            self.read_axis(device, Axis::X)?,
            self.read_axis(device, Axis::Y)?,
            self.read_axis(device, Axis::Z)?,
        );
        debug!(%device, x = reading.x, y = reading.y, z = reading.z, "raw reading");
        Ok(reading)
    }
}

/// Plays back recorded readings, one queue per device.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    touchscreen: VecDeque<RawVector>,
    keyboard: VecDeque<RawVector>,
}

impl ReplaySource {
    pub fn new(samples: impl IntoIterator<Item = DualSample<i32>>) -> Self {
        let mut source = Self::default();
        for sample in samples {
            source.push(sample);
        }
        source
    }

    pub fn push(&mut self, sample: DualSample<i32>) {
        self.touchscreen.push_back(sample.touchscreen);
        self.keyboard.push_back(sample.keyboard);
    }

    /// Readings left for `device`.
    pub fn remaining(&self, device: Device) -> usize {
        match device {
            Device::Touchscreen => self.touchscreen.len(),
            Device::Keyboard => self.keyboard.len(),
        }
    }
}

impl SensorSource for ReplaySource {
    fn read(&mut self, device: Device) -> Result<RawVector> {
        let queue = match device {
            Device::Touchscreen => &mut self.touchscreen,
            Device::Keyboard => &mut self.keyboard,
        };
        queue
            .pop_front()
            .ok_or(SensingError::SourceExhausted { device })
    }
}

/// Reports whether the lid (display) is open.
pub trait LidSensor {
    fn is_open(&mut self) -> Result<bool>;
}

/// For machines without a lid switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpen;

impl LidSensor for AlwaysOpen {
    fn is_open(&mut self) -> Result<bool> {
        Ok(true)
    }
}

/// ACPI lid button state file, e.g. `/proc/acpi/button/lid/LID0/state`.
///
/// The file reads `state:      open` or `state:      closed`.
#[derive(Debug, Clone)]
pub struct AcpiLid {
    path: PathBuf,
}

impl AcpiLid {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LidSensor for AcpiLid {
    fn is_open(&mut self) -> Result<bool> {
        let text = fs::read_to_string(&self.path).map_err(|e| SensingError::io(&self.path, e))?;
        let state = text
            .split(':')
            .nth(1)
            .map(str::trim)
            .unwrap_or_else(|| text.trim());
        match state {
            "open" => Ok(true),
            "closed" => Ok(false),
            other => Err(SensingError::LidState {
                path: self.path.clone(),
                state: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_device(root: &Path, name: &str, values: [&str; 3]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (axis, value) in ["x", "y", "z"].iter().zip(values) {
            fs::write(dir.join(format!("in_accel_{axis}_raw")), value).unwrap();
        }
    }

    fn fake_sysfs() -> TempDir {
        let root = TempDir::new().unwrap();
        write_device(root.path(), "iio:device0", ["-106\n", "15\n", "-504\n"]);
        write_device(root.path(), "iio:device1", ["18\n", "14\n", "-547\n"]);
        root
    }

    #[test]
    fn test_sysfs_reads_both_devices() {
        let root = fake_sysfs();
        let mut source = SysfsSource::new(root.path(), "iio:device0", "iio:device1");

        let pair = source.read_pair().unwrap();
        assert_eq!(pair.touchscreen, RawVector::new(-106, 15, -504));
        assert_eq!(pair.keyboard, RawVector::new(18, 14, -547));
    }

    #[test]
    fn test_sysfs_zero_is_a_valid_reading() {
        let root = TempDir::new().unwrap();
        write_device(root.path(), "ts", ["0", "0", "0"]);
        let mut source = SysfsSource::new(root.path(), "ts", "kb");
        assert_eq!(source.read(Device::Touchscreen).unwrap(), RawVector::new(0, 0, 0));
    }

    #[test]
    fn test_sysfs_non_numeric_is_malformed() {
        let root = TempDir::new().unwrap();
        write_device(root.path(), "ts", ["12", "abc", "7"]);
        let mut source = SysfsSource::new(root.path(), "ts", "kb");
        let err = source.read(Device::Touchscreen).unwrap_err();
        assert!(matches!(
            err,
            SensingError::MalformedSample {
                device: Device::Touchscreen,
                axis: Axis::Y,
                ..
            }
        ));
    }

    #[test]
    fn test_sysfs_empty_attribute_is_malformed() {
        let root = TempDir::new().unwrap();
        write_device(root.path(), "kb", ["1", "2", "  \n"]);
        let mut source = SysfsSource::new(root.path(), "ts", "kb");
        let err = source.read(Device::Keyboard).unwrap_err();
        assert!(matches!(err, SensingError::MalformedSample { axis: Axis::Z, .. }));
    }

    #[test]
    fn test_sysfs_missing_device_is_io_error() {
        let root = TempDir::new().unwrap();
        let mut source = SysfsSource::new(root.path(), "ts", "kb");
        assert!(matches!(
            source.read(Device::Keyboard),
            Err(SensingError::Io { .. })
        ));
    }

    #[test]
    fn test_replay_source_order_and_exhaustion() {
        let mut source = ReplaySource::new([
            DualSample::new(RawVector::new(1, 1, 1), RawVector::new(2, 2, 2)),
            DualSample::new(RawVector::new(3, 3, 3), RawVector::new(4, 4, 4)),
        ]);
        assert_eq!(source.remaining(Device::Keyboard), 2);
        assert_eq!(source.read_pair().unwrap().keyboard, RawVector::new(2, 2, 2));
        assert_eq!(source.read_pair().unwrap().touchscreen, RawVector::new(3, 3, 3));
        assert!(matches!(
            source.read_pair(),
            Err(SensingError::SourceExhausted {
                device: Device::Touchscreen
            })
        ));
    }

    #[test]
    fn test_acpi_lid_states() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state");

        fs::write(&path, "state:      open\n").unwrap();
        let mut lid = AcpiLid::new(&path);
        assert!(lid.is_open().unwrap());

        fs::write(&path, "state:      closed\n").unwrap();
        assert!(!lid.is_open().unwrap());

        assert!(AlwaysOpen.is_open().unwrap());
    }

    #[test]
    fn test_acpi_lid_rejects_unknown_states() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state");
        let mut lid = AcpiLid::new(&path);

        for content in ["", "\n", "state:      garbage\n", "state:\n", "opened"] {
            fs::write(&path, content).unwrap();
            let err = lid.is_open().unwrap_err();
            assert!(
                matches!(err, SensingError::LidState { .. }),
                "{content:?} gave {err}"
            );
        }

        fs::remove_file(&path).unwrap();
        assert!(matches!(lid.is_open(), Err(SensingError::Io { .. })));
    }
}
