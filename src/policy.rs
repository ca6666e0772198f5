//! Combination of detector verdicts into one tablet-mode decision.
//!
//! Detectors never see each other's results; this module is the single
//! place where they are combined. The policy is an OR over an ordered list
//! of detectors. Every detector is evaluated so the full set of verdicts
//! can be logged, even after one has fired.
//!
//! The folded detector cannot distinguish a 360° fold from a closed laptop
//! lying flat, so by default its verdict only counts while the lid is open.

use crate::classifier::DetectorKind;
use crate::error::{Result, SensingError};
use crate::types::Vector3;

/// Verdict of one detector for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub kind: DetectorKind,
    /// Raw detector output.
    pub fired: bool,
    /// The verdict was discarded because the lid was closed.
    pub suppressed: bool,
}

impl Verdict {
    /// Whether this verdict counts towards tablet mode.
    pub fn counts(&self) -> bool {
        self.fired && !self.suppressed
    }
}

/// All verdicts of one poll, in policy order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdicts {
    verdicts: Vec<Verdict>,
}

impl Verdicts {
    /// OR over every counting verdict.
    pub fn is_tablet(&self) -> bool {
        self.verdicts.iter().any(Verdict::counts)
    }

    /// Detectors whose verdict counted.
    pub fn fired(&self) -> impl Iterator<Item = DetectorKind> + '_ {
        self.verdicts.iter().filter(|v| v.counts()).map(|v| v.kind)
    }

    pub fn get(&self, kind: DetectorKind) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter()
    }

    /// True when every detector reached the same raw decision.
    pub fn unanimous(&self) -> bool {
        let mut raw = self.verdicts.iter().map(|v| v.fired);
        match raw.next() {
            Some(first) => raw.all(|fired| fired == first),
            None => true,
        }
    }
}

/// OR-combination of detectors with optional lid gating of the fold check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionPolicy {
    detectors: Vec<DetectorKind>,
    require_lid_open_for_fold: bool,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            detectors: vec![DetectorKind::Folded, DetectorKind::Threshold],
            require_lid_open_for_fold: true,
        }
    }
}

impl DetectionPolicy {
    /// Create a policy. Duplicates are dropped, the list must not be empty.
    pub fn new(detectors: &[DetectorKind], require_lid_open_for_fold: bool) -> Result<Self> {
        let mut unique = Vec::with_capacity(detectors.len());
        for kind in detectors {
            if !unique.contains(kind) {
                unique.push(*kind);
            }
        }
        if unique.is_empty() {
            return Err(SensingError::Config(
                "detection policy needs at least one detector".to_string(),
            ));
        }
        Ok(Self {
            detectors: unique,
            require_lid_open_for_fold,
        })
    }

    pub fn detectors(&self) -> &[DetectorKind] {
        &self.detectors
    }

    pub fn requires_lid_open_for_fold(&self) -> bool {
        self.require_lid_open_for_fold
    }

    /// Evaluate every detector of the policy.
    pub fn evaluate(
        &self,
        touchscreen: &Vector3<f64>,
        keyboard: &Vector3<f64>,
        lid_open: bool,
    ) -> Verdicts {
        let verdicts = self
            .detectors
            .iter()
            .map(|&kind| Verdict {
                kind,
                fired: kind.is_tablet(touchscreen, keyboard),
                suppressed: kind == DetectorKind::Folded
                    && self.require_lid_open_for_fold
                    && !lid_open,
            })
            .collect();
        Verdicts { verdicts }
    }
}
