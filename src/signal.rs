//! Gravity suppression by exponential smoothing.
//!
//! This module provides the per-device, per-axis filter applied to a
//! recorded sample stream:
//! - `AxisFilter`: one smoothing state for one axis
//! - `HighPassFilter`: three axis filters for one accelerometer
//! - `FilterBank`: one filter per device, reset together between sessions
//!
//! Design note: All filters use incremental updates (O(1) per sample).
//! The first sample of a session seeds the state and passes through
//! unfiltered; every later sample is `x*α + last*(1-α)`.
//!
//! A filter state belongs to one continuous recording of one device.
//! Feeding it samples from another device or across a recording gap
//! corrupts the smoothing; call `reset()` when a new session starts.

use tracing::trace;

use crate::error::{Result, SensingError};
use crate::types::{Device, DualSample, Vector3};

/// Smoothing factor used by the recording tools.
pub const DEFAULT_FILTER_ALPHA: f64 = 0.1;

/// Parameters for signal filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Weight of the incoming sample. Range: (0.0, 1.0].
    /// Lower = smoother, slower to follow the input.
    alpha: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_FILTER_ALPHA,
        }
    }
}

impl FilterConfig {
    pub fn new(alpha: f64) -> Result<Self> {
        let config = Self { alpha };
        config.validate()?;
        Ok(config)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(SensingError::Config(format!(
                "filter alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Smoothing state of a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFilter {
    last: Option<f64>,
    alpha: f64,
}

impl AxisFilter {
    /// An unseeded filter: the next sample passes through unchanged.
    pub fn new(alpha: f64) -> Self {
        Self { last: None, alpha }
    }

    /// A filter whose previous output is already `initial`.
    pub fn seeded(alpha: f64, initial: f64) -> Self {
        Self {
            last: Some(initial),
            alpha,
        }
    }

    /// Filter one value and store it as the new state.
    pub fn apply(&mut self, value: f64) -> f64 {
        let filtered = match self.last {
            None => value,
            Some(last) => value * self.alpha + last * (1.0 - self.alpha),
        };
        self.last = Some(filtered);
        filtered
    }

    /// Previous output, if any sample has been seen.
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Exponential smoothing of one accelerometer's three axes.
#[derive(Debug, Clone)]
pub struct HighPassFilter {
    axes: [AxisFilter; 3],
    config: FilterConfig,
    sample_count: u64,
}

impl HighPassFilter {
    /// Create a filter with default configuration.
    pub fn new() -> Self {
        Self::with_config(FilterConfig::default())
    }

    /// Create a filter with custom configuration.
    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            axes: [AxisFilter::new(config.alpha); 3],
            config,
            sample_count: 0,
        }
    }

    /// Filter one reading. The first reading after construction or reset
    /// is returned as is.
    pub fn apply(&mut self, sample: Vector3<f64>) -> Vector3<f64> {
        self.sample_count += 1;
        Vector3::new(
            self.axes[0].apply(sample.x),
            self.axes[1].apply(sample.y),
            self.axes[2].apply(sample.z),
        )
    }

    /// Previous filtered reading, if the filter has been seeded.
    pub fn last(&self) -> Option<Vector3<f64>> {
        Some(Vector3::new(
            self.axes[0].last()?,
            self.axes[1].last()?,
            self.axes[2].last()?,
        ))
    }

    pub fn is_seeded(&self) -> bool {
        self.last().is_some()
    }

    /// Get the number of samples processed since the last reset.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn config(&self) -> FilterConfig {
        self.config
    }

    /// Forget the smoothing state. Required at the start of a new session.
    pub fn reset(&mut self) {
        for axis in &mut self.axes {
            axis.reset();
        }
        self.sample_count = 0;
    }
}

impl Default for HighPassFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// One filter per accelerometer. The two states are never shared.
#[derive(Debug, Clone, Default)]
pub struct FilterBank {
    touchscreen: HighPassFilter,
    keyboard: HighPassFilter,
}

impl FilterBank {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            touchscreen: HighPassFilter::with_config(config),
            keyboard: HighPassFilter::with_config(config),
        }
    }

    /// Filter a reading of `device`.
    pub fn apply(&mut self, device: Device, sample: Vector3<f64>) -> Vector3<f64> {
        let filtered = self.filter_mut(device).apply(sample);
        trace!(%device, x = filtered.x, y = filtered.y, z = filtered.z, "filtered sample");
        filtered
    }

    /// Filter both readings of a poll.
    pub fn apply_dual(&mut self, sample: &DualSample<f64>) -> DualSample<f64> {
        DualSample::new(
            self.apply(Device::Touchscreen, sample.touchscreen),
            self.apply(Device::Keyboard, sample.keyboard),
        )
    }

    pub fn filter(&self, device: Device) -> &HighPassFilter {
        match device {
            Device::Touchscreen => &self.touchscreen,
            Device::Keyboard => &self.keyboard,
        }
    }

    fn filter_mut(&mut self, device: Device) -> &mut HighPassFilter {
        match device {
            Device::Touchscreen => &mut self.touchscreen,
            Device::Keyboard => &mut self.keyboard,
        }
    }

    /// Reset both devices for a new recording session.
    pub fn reset(&mut self) {
        self.touchscreen.reset();
        self.keyboard.reset();
    }
}
