//! Tablet-mode detection for 2-in-1 convertibles.
//!
//! A convertible carries one triple-axis accelerometer in each half: the
//! base (keyboard) and the display (touchscreen). This library turns raw
//! readings of both into tilt angles, a gravity-suppressed stream, and a
//! laptop/tablet posture decision.
//!
//! # Design Philosophy
//!
//! - **Raw counts in, decisions out**: readings stay on the sensors' raw
//!   scale. The detector thresholds are tuned against that scale.
//! - **Independent detectors**: the threshold table, the fold check and the
//!   regression formula never see each other. Combining them is an explicit
//!   [`policy::DetectionPolicy`].
//! - **Fail-loud behavior**: degenerate vectors, zero denominators and
//!   malformed readings are errors, never silent zeros.
//! - **Injected sources**: the core reads through [`source::SensorSource`];
//!   no path is hardcoded.
//!
//! # Example
//!
//! ```
//! use tabletmode::classifier::{DetectorKind, TabletDetector, ThresholdClassifier};
//! use tabletmode::types::RawVector;
//! use tabletmode::vector::tilt_angles;
//!
//! let touchscreen = RawVector::new(0, -10, 400).as_f64();
//! let keyboard = RawVector::new(0, 0, 0).as_f64();
//!
//! assert!(ThresholdClassifier.is_tablet(&touchscreen, &keyboard));
//! assert!(!DetectorKind::Formula.is_tablet(&touchscreen, &keyboard));
//!
//! let tilt = tilt_angles(&touchscreen).unwrap().rounded_degrees();
//! assert_eq!(tilt.roll, 0.0);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod policy;
pub mod signal;
pub mod source;
pub mod types;
pub mod vector;

mod stress_tests;

// Re-export commonly used types
pub use classifier::{
    DetectorKind, FoldedScreenDetector, FormulaClassifier, TabletDetector, ThresholdClassifier,
};
pub use config::SensingConfig;
pub use error::{Result, SensingError};
pub use pipeline::{MonitorEvent, TabletModeMonitor};
pub use policy::{DetectionPolicy, Verdicts};
pub use signal::{FilterBank, FilterConfig, HighPassFilter};
pub use source::{ReplaySource, SensorSource, SysfsSource};
pub use types::{AngleTriple, Device, DualSample, RawVector, Vector3};
