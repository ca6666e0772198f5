//! Detection of a screen folded flat against the keyboard.
//!
//! Folded back by 360°, both halves lie on top of each other and their z
//! axes read gravity in the same direction with similar magnitude. That is
//! also what a closed laptop lying on a desk looks like, so callers should
//! only trust this detector while the lid reports open (see
//! [`crate::policy::DetectionPolicy`]).

use crate::types::Vector3;

use super::TabletDetector;

/// Largest z distance still considered "folded flat".
pub const MAX_FOLDED_Z_DISTANCE: f64 = 100.0;

/// Distance between two readings of the same axis.
///
/// Same-signed values give their plain difference. Values of opposite
/// signs (or a zero against a nonzero) give the sum of magnitudes.
pub fn signed_distance(a: f64, b: f64) -> f64 {
    if a > 0.0 && b > 0.0 {
        a.max(b) - a.min(b)
    } else if a < 0.0 && b < 0.0 {
        (a - b).abs()
    } else if a == b {
        0.0
    } else {
        a.abs() + b.abs()
    }
}

/// `true` when the two z readings are within [`MAX_FOLDED_Z_DISTANCE`].
pub fn detect_max_folded(touchscreen: &Vector3<f64>, keyboard: &Vector3<f64>) -> bool {
    signed_distance(touchscreen.z, keyboard.z) < MAX_FOLDED_Z_DISTANCE
}

/// Stateless detector over the z-axis distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldedScreenDetector;

impl TabletDetector for FoldedScreenDetector {
    fn name(&self) -> &'static str {
        "folded"
    }

    fn is_tablet(&self, touchscreen: &Vector3<f64>, keyboard: &Vector3<f64>) -> bool {
        detect_max_folded(touchscreen, keyboard)
    }
}
