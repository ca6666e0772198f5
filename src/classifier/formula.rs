//! Scoring classifier from a symbolic-regression fit.
//!
//! The expression was produced by a regression tool over labelled captures
//! and is kept as an alternate path next to the threshold table. The two
//! are not expected to agree on every input.
//!
//! ```text
//! score =  49 * [-34 < kb.x]
//!        + kb.x * [ts.y < ts.z]
//!        + kb.z * [-36 < ts.y + ts.z]
//!        - 89 - kb.z * [ts.y < -14]
//!        - kb.x * [ts.z < kb.z * [kb.x < kb.x * [ts.y < ts.z]]]
//! ```

use crate::types::Vector3;

use super::TabletDetector;

/// Indicator term: `1` when `cond` holds, else `0`.
fn step(cond: bool) -> f64 {
    if cond {
        1.0
    } else {
        0.0
    }
}

/// Raw score of the expression. Positive means tablet.
pub fn score(keyboard: &Vector3<f64>, touchscreen: &Vector3<f64>) -> f64 {
    let (kb, ts) = (keyboard, touchscreen);

    let mut res = 49.0 * step(-34.0 < kb.x);
    res += kb.x * step(ts.y < ts.z);
    res += kb.z * step(-36.0 < ts.y + ts.z);
    res += -89.0 - kb.z * step(ts.y < -14.0);

    // The nested term, innermost first; each stage reads the previous one.
    let mut tmp = kb.x * step(ts.y < ts.z);
    tmp = kb.z * step(kb.x < tmp);
    tmp = -kb.x * step(ts.z < tmp);

    res + tmp
}

/// `true` when the score is strictly positive.
pub fn detect_tabletmode_formula(keyboard: &Vector3<f64>, touchscreen: &Vector3<f64>) -> bool {
    score(keyboard, touchscreen) > 0.0
}

/// Stateless detector over the regression score.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaClassifier;

impl TabletDetector for FormulaClassifier {
    fn name(&self) -> &'static str {
        "formula"
    }

    fn is_tablet(&self, touchscreen: &Vector3<f64>, keyboard: &Vector3<f64>) -> bool {
        detect_tabletmode_formula(keyboard, touchscreen)
    }
}
