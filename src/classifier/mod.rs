//! Tablet-mode detectors.
//!
//! Three independent strategies decide whether a convertible is in tablet
//! posture from one reading of each accelerometer:
//! - [`ThresholdClassifier`]: the empirically tuned decision table (primary)
//! - [`FoldedScreenDetector`]: screen folded flat against the keyboard
//! - [`FormulaClassifier`]: symbolic-regression score (alternate)
//!
//! None of them sees the others' results. Combining verdicts is a caller
//! policy, see [`crate::policy::DetectionPolicy`].
//!
//! All inputs are on the raw-count scale of the sensors. Filtered readings
//! may be passed as long as they were not rescaled.

pub mod folded;
pub mod formula;
pub mod threshold;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Vector3;

pub use folded::{detect_max_folded, signed_distance, FoldedScreenDetector};
pub use formula::{detect_tabletmode_formula, FormulaClassifier};
pub use threshold::{
    detect_tabletmode_thresholds, matching_rule, ThresholdClassifier, ThresholdRule,
};

/// A pure tablet-mode decision over one reading of each device.
pub trait TabletDetector {
    /// Short stable name, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// `true` if the readings indicate tablet posture.
    fn is_tablet(&self, touchscreen: &Vector3<f64>, keyboard: &Vector3<f64>) -> bool;
}

/// Selects one of the built-in detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Threshold,
    Folded,
    Formula,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 3] = [
        DetectorKind::Threshold,
        DetectorKind::Folded,
        DetectorKind::Formula,
    ];

    pub fn detector(&self) -> &'static dyn TabletDetector {
        match self {
            DetectorKind::Threshold => &ThresholdClassifier,
            DetectorKind::Folded => &FoldedScreenDetector,
            DetectorKind::Formula => &FormulaClassifier,
        }
    }

    pub fn is_tablet(&self, touchscreen: &Vector3<f64>, keyboard: &Vector3<f64>) -> bool {
        self.detector().is_tablet(touchscreen, keyboard)
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.detector().name())
    }
}
