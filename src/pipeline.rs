//! Live tablet-mode monitoring pipeline.
//!
//! This module wires a sensor source, a lid sensor and a detection policy
//! into a poll-driven state machine:
//! 1. **Acquisition**: read one raw sample from each accelerometer
//! 2. **Detection**: evaluate every detector of the policy
//! 3. **Decision**: OR the counting verdicts into one tablet flag
//! 4. **Transition**: report a change only when the flag flips
//!
//! The caller owns the polling cadence and whatever reacts to a transition
//! (disabling the internal keyboard and touchpad, for instance). A failed
//! read leaves the current decision untouched.

use tracing::{debug, info, warn};

use crate::config::SensingConfig;
use crate::error::Result;
use crate::policy::{DetectionPolicy, Verdicts};
use crate::source::{AcpiLid, AlwaysOpen, LidSensor, SensorSource, SysfsSource};
use crate::types::DualSample;

/// Change of posture reported by one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Same posture as the previous poll.
    Unchanged,
    /// The device just entered tablet posture.
    EnteredTablet,
    /// The device just went back to laptop posture.
    LeftTablet,
}

/// Everything observed during one poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub sample: DualSample<i32>,
    pub lid_open: bool,
    pub verdicts: Verdicts,
    pub event: MonitorEvent,
}

impl PollOutcome {
    pub fn is_tablet(&self) -> bool {
        self.verdicts.is_tablet()
    }
}

/// Poll-driven tablet-mode state machine.
pub struct TabletModeMonitor<S, L> {
    source: S,
    lid: L,
    policy: DetectionPolicy,

    is_tablet: bool,
    poll_count: u64,
    transition_count: u64,
}

impl<S: SensorSource, L: LidSensor> TabletModeMonitor<S, L> {
    /// Creates a monitor starting in laptop posture.
    pub fn new(source: S, lid: L, policy: DetectionPolicy) -> Self {
        Self {
            source,
            lid,
            policy,
            is_tablet: false,
            poll_count: 0,
            transition_count: 0,
        }
    }

    /// Acquire both readings, classify and update the posture.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        let sample = match self.source.read_pair() {
            Ok(sample) => sample,
            Err(err) => {
                warn!(error = %err, "cannot read from one or both accelerometers");
                return Err(err);
            }
        };
        let lid_open = match self.lid.is_open() {
            Ok(open) => open,
            Err(err) => {
                warn!(error = %err, "cannot read the lid state");
                return Err(err);
            }
        };
        self.poll_count += 1;

        let wide = sample.as_f64();
        let verdicts = self
            .policy
            .evaluate(&wide.touchscreen, &wide.keyboard, lid_open);
        let is_tablet = verdicts.is_tablet();

        debug!(
            ts = %sample.touchscreen,
            kb = %sample.keyboard,
            lid_open,
            is_tablet,
            "poll"
        );

        let event = match (self.is_tablet, is_tablet) {
            (false, true) => MonitorEvent::EnteredTablet,
            (true, false) => MonitorEvent::LeftTablet,
            _ => MonitorEvent::Unchanged,
        };
        if event != MonitorEvent::Unchanged {
            self.transition_count += 1;
            let fired: Vec<String> = verdicts.fired().map(|k| k.to_string()).collect();
            info!(
                tablet = is_tablet,
                detectors = ?fired,
                "inputs {}",
                if is_tablet { "disabled" } else { "enabled" }
            );
        }
        self.is_tablet = is_tablet;

        Ok(PollOutcome {
            sample,
            lid_open,
            verdicts,
            event,
        })
    }

    /// Posture decided by the last successful poll.
    pub fn is_tablet(&self) -> bool {
        self.is_tablet
    }

    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    pub fn policy(&self) -> &DetectionPolicy {
        &self.policy
    }

    /// Back to laptop posture, e.g. after resume.
    pub fn reset(&mut self) {
        self.is_tablet = false;
    }
}

/// Lid sensor chosen from configuration.
pub enum ConfiguredLid {
    Acpi(AcpiLid),
    AlwaysOpen(AlwaysOpen),
}

impl LidSensor for ConfiguredLid {
    fn is_open(&mut self) -> Result<bool> {
        match self {
            ConfiguredLid::Acpi(lid) => lid.is_open(),
            ConfiguredLid::AlwaysOpen(lid) => lid.is_open(),
        }
    }
}

/// Monitor over the sysfs devices and lid file named in `config`.
pub fn monitor_from_config(
    config: &SensingConfig,
) -> Result<TabletModeMonitor<SysfsSource, ConfiguredLid>> {
    let lid = match &config.monitor.lid_state_path {
        Some(path) => ConfiguredLid::Acpi(AcpiLid::new(path)),
        None => ConfiguredLid::AlwaysOpen(AlwaysOpen),
    };
    Ok(TabletModeMonitor::new(
        SysfsSource::from_config(&config.sensors),
        lid,
        config.monitor.policy()?,
    ))
}
