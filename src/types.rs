//! Core data types for tablet-mode sensing.
//!
//! This module defines the vectors, angle triples and device identities
//! passed between the sensor sources, the signal filter and the detectors.
//!
//! Design principle: Types should make intent obvious. A reading always
//! carries its device, an angle triple always carries its unit.

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

/// A three-component vector.
///
/// Raw accelerometer readings are `Vector3<i32>` (sensor register counts).
/// Filtered and derived values are `Vector3<f64>`. No unit conversion is
/// ever applied to raw counts: every threshold in the detectors is tuned
/// against the raw-count scale of the sensors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// A raw reading in sensor counts.
pub type RawVector = Vector3<i32>;

impl<T: Copy> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Components in `[x, y, z]` order.
    pub fn to_array(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Apply `f` to every component.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Vector3<U> {
        Vector3::new(f(self.x), f(self.y), f(self.z))
    }
}

impl<T: Copy> From<[T; 3]> for Vector3<T> {
    fn from(axes: [T; 3]) -> Self {
        Self::new(axes[0], axes[1], axes[2])
    }
}

impl Vector3<i32> {
    /// Lossless widening of a raw reading for floating point processing.
    pub fn as_f64(&self) -> Vector3<f64> {
        self.map(f64::from)
    }
}

impl From<Vector3<i32>> for Vector3<f64> {
    fn from(raw: Vector3<i32>) -> Self {
        raw.as_f64()
    }
}

impl Neg for Vector3<f64> {
    type Output = Vector3<f64>;

    fn neg(self) -> Self::Output {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl<T: fmt::Display> fmt::Display for Vector3<T> {
    /// Formats as `x;y;z`, the separator used by the live capture tools.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.x, self.y, self.z)
    }
}

/// Identity of one of the two accelerometers of a convertible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Sensor in the display half.
    Touchscreen,
    /// Sensor in the base half.
    Keyboard,
}

impl Device {
    /// Both devices, touchscreen first (the capture column order).
    pub const ALL: [Device; 2] = [Device::Touchscreen, Device::Keyboard];

    /// Short prefix used in CSV headers and log fields.
    pub fn prefix(&self) -> &'static str {
        match self {
            Device::Touchscreen => "ts",
            Device::Keyboard => "kb",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Touchscreen => f.write_str("touchscreen"),
            Device::Keyboard => f.write_str("keyboard"),
        }
    }
}

/// Name of a single accelerometer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reading from each accelerometer, taken in the same poll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DualSample<T> {
    pub touchscreen: Vector3<T>,
    pub keyboard: Vector3<T>,
}

impl<T: Copy> DualSample<T> {
    pub fn new(touchscreen: Vector3<T>, keyboard: Vector3<T>) -> Self {
        Self {
            touchscreen,
            keyboard,
        }
    }

    /// The reading belonging to `device`.
    pub fn get(&self, device: Device) -> Vector3<T> {
        match device {
            Device::Touchscreen => self.touchscreen,
            Device::Keyboard => self.keyboard,
        }
    }
}

impl DualSample<i32> {
    pub fn as_f64(&self) -> DualSample<f64> {
        DualSample::new(self.touchscreen.as_f64(), self.keyboard.as_f64())
    }
}

/// Three tilt angles derived from one gravity-projection vector.
///
/// Stored in radians. `yaw` is not an inertial yaw: an accelerometer cannot
/// observe rotation about gravity. It is the angle of the z axis relative
/// to the xy plane and keeps its historical label because recorded data
/// and downstream tooling use that name.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngleTriple {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AngleTriple {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Same angles converted to degrees, unrounded.
    pub fn to_degrees(&self) -> AngleTriple {
        AngleTriple::new(
            crate::vector::to_degrees(self.roll),
            crate::vector::to_degrees(self.pitch),
            crate::vector::to_degrees(self.yaw),
        )
    }

    /// Degrees rounded to 2 decimals. Presentation only: never feed the
    /// result back into a computation.
    pub fn rounded_degrees(&self) -> AngleTriple {
        let deg = self.to_degrees();
        AngleTriple::new(round2(deg.roll), round2(deg.pitch), round2(deg.yaw))
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.roll, self.pitch, self.yaw]
    }
}

// Adding 0.0 turns a rounded -0.0 into 0.0.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
