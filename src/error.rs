//! Error types for tablet-mode sensing.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Axis, Device};

/// Errors raised by the sensing core and its sources.
///
/// Every failure is local: there are no transient errors to retry.
#[derive(Debug, Error)]
pub enum SensingError {
    /// A vector with zero or non-finite magnitude was given where a
    /// direction is needed.
    #[error("degenerate vector: zero or non-finite magnitude")]
    DegenerateVector,

    /// A tilt angle denominator was exactly zero.
    #[error("division by zero while computing {angle}")]
    DivisionByZero {
        /// Name of the angle (`roll`, `pitch` or `yaw`).
        angle: &'static str,
    },

    /// A reading was empty, non-numeric or incomplete.
    ///
    /// Never replaced by zero: zero is a meaningful reading.
    #[error("malformed sample from {device} axis {axis}: {reason}")]
    MalformedSample {
        device: Device,
        axis: Axis,
        reason: String,
    },

    /// A replay source has no more readings for a device.
    #[error("no more recorded samples for {device}")]
    SourceExhausted { device: Device },

    /// A lid state file held neither `open` nor `closed`.
    #[error("unrecognized lid state {state:?} in {path}")]
    LidState { path: PathBuf, state: String },

    /// A recorded CSV line could not be parsed.
    #[error("invalid CSV record at line {line}: {reason}")]
    Csv { line: usize, reason: String },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O operation on `path` failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SensingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SensingError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SensingError>;
