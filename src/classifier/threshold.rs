//! Empirical threshold rules, the primary tablet-mode classifier.
//!
//! The rules were fit against raw readings of one convertible in each
//! rotation (forward, backward, left, right and combinations). They form a
//! decision table: order and literal values are part of the behavior and
//! must not be merged or simplified.

use crate::types::Vector3;

use super::TabletDetector;

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdRule {
    /// Touchscreen rotated forward around x.
    TouchscreenForward,
    /// Touchscreen rotated left or right in its own plane.
    TouchscreenSideways,
    /// Touchscreen rotated forward-left.
    TouchscreenForwardLeft,
    /// Keyboard rotated forward around y.
    KeyboardForward,
    /// Keyboard rotated backward around y.
    KeyboardBackward,
    /// Keyboard rotated right around x.
    KeyboardRight,
    /// Keyboard rotated left around x.
    KeyboardLeft,
    /// Keyboard rotated forward-left.
    KeyboardForwardLeft,
}

impl ThresholdRule {
    /// Evaluation order.
    pub const ORDER: [ThresholdRule; 8] = [
        ThresholdRule::TouchscreenForward,
        ThresholdRule::TouchscreenSideways,
        ThresholdRule::TouchscreenForwardLeft,
        ThresholdRule::KeyboardForward,
        ThresholdRule::KeyboardBackward,
        ThresholdRule::KeyboardRight,
        ThresholdRule::KeyboardLeft,
        ThresholdRule::KeyboardForwardLeft,
    ];

    /// Whether this rule holds for the given readings.
    pub fn holds(&self, keyboard: &Vector3<f64>, touchscreen: &Vector3<f64>) -> bool {
        let (kb, ts) = (keyboard, touchscreen);
        match self {
            ThresholdRule::TouchscreenForward => ts.y < 0.0 && ts.z < 500.0,
            ThresholdRule::TouchscreenSideways => ts.y < 320.0 && (ts.x > 380.0 || ts.x < -380.0),
            ThresholdRule::TouchscreenForwardLeft => ts.x > -150.0 && ts.y < 250.0 && ts.z > 360.0,
            ThresholdRule::KeyboardForward => kb.x < 0.0 && kb.z > -400.0,
            ThresholdRule::KeyboardBackward => kb.x < 410.0 && kb.z > 280.0,
            ThresholdRule::KeyboardRight => kb.y > -445.0 && kb.z > -260.0,
            ThresholdRule::KeyboardLeft => kb.y > 480.0 && kb.z > -230.0,
            ThresholdRule::KeyboardForwardLeft => kb.x > 220.0 && kb.y < -350.0 && kb.z > -335.0,
        }
    }

    /// 1-based position in the table.
    pub fn number(&self) -> usize {
        match self {
            ThresholdRule::TouchscreenForward => 1,
            ThresholdRule::TouchscreenSideways => 2,
            ThresholdRule::TouchscreenForwardLeft => 3,
            ThresholdRule::KeyboardForward => 4,
            ThresholdRule::KeyboardBackward => 5,
            ThresholdRule::KeyboardRight => 6,
            ThresholdRule::KeyboardLeft => 7,
            ThresholdRule::KeyboardForwardLeft => 8,
        }
    }
}

/// First rule that holds, in table order.
pub fn matching_rule(keyboard: &Vector3<f64>, touchscreen: &Vector3<f64>) -> Option<ThresholdRule> {
    ThresholdRule::ORDER
        .into_iter()
        .find(|rule| rule.holds(keyboard, touchscreen))
}

/// `true` as soon as any rule holds.
pub fn detect_tabletmode_thresholds(keyboard: &Vector3<f64>, touchscreen: &Vector3<f64>) -> bool {
    matching_rule(keyboard, touchscreen).is_some()
}

/// Stateless detector over the threshold table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdClassifier;

impl TabletDetector for ThresholdClassifier {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn is_tablet(&self, touchscreen: &Vector3<f64>, keyboard: &Vector3<f64>) -> bool {
        detect_tabletmode_thresholds(keyboard, touchscreen)
    }
}
