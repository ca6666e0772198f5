//! CSV records for captures, angle dumps and filtered exports.
//!
//! The column order is fixed by existing datasets:
//! - live capture: `ts_ax;ts_ay;ts_az;kb_ax;kb_ay;kb_az;is_tablet`
//! - angle dump: raw and tilt (degrees) of both devices plus a Unix
//!   timestamp in milliseconds
//! - hinge dump: raw of both devices and the angle between them (degrees)
//!
//! Live tools separate fields with `;`. Filtered exports, which feed the
//! regression tool, use a single space. The tablet label is written as
//! `0`/`1` and read back from `0`/`1`/`true`/`false` (or their numeric
//! `0.0`/`1.0` forms left by earlier filtered exports).

use std::fmt::Write as _;

use tracing::debug;

use crate::error::{Result, SensingError};
use crate::signal::{FilterBank, FilterConfig};
use crate::types::{round2, AngleTriple, DualSample, RawVector, Vector3};
use crate::vector::{angle_between, to_degrees};

/// Separator of live captures.
pub const CAPTURE_SEPARATOR: char = ';';

/// Separator of filtered exports.
pub const EXPORT_SEPARATOR: char = ' ';

/// Header of a live capture.
pub const CAPTURE_HEADER: &str = "ts_ax;ts_ay;ts_az;kb_ax;kb_ay;kb_az;is_tablet";

/// Header of an angle dump.
pub const ANGLE_HEADER: &str =
    "ts_ax;ts_ay;ts_az;ts_rx;ts_ry;ts_rz;kb_ax;kb_ay;kb_az;kb_rx;kb_ry;kb_rz;timestamp";

/// Header of a hinge angle dump.
pub const HINGE_HEADER: &str = "ts_ax;ts_ay;ts_az;kb_ax;kb_ay;kb_az;angle";

const CAPTURE_FIELDS: usize = 7;

/// One labelled capture line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRow<T> {
    pub sample: DualSample<T>,
    pub is_tablet: bool,
}

impl<T: Copy + std::fmt::Display> CaptureRow<T> {
    pub fn new(sample: DualSample<T>, is_tablet: bool) -> Self {
        Self { sample, is_tablet }
    }

    /// Fields joined by `sep`, label as `0`/`1`.
    pub fn to_csv_line(&self, sep: char) -> String {
        let ts = self.sample.touchscreen;
        let kb = self.sample.keyboard;
        let mut line = String::with_capacity(48);
        for value in [ts.x, ts.y, ts.z, kb.x, kb.y, kb.z] {
            let _ = write!(line, "{value}{sep}");
        }
        line.push(if self.is_tablet { '1' } else { '0' });
        line
    }
}

impl CaptureRow<i32> {
    /// Parse a raw capture line (integer readings).
    pub fn parse(line: &str, line_number: usize) -> Result<Self> {
        let fields = split_fields(line, line_number)?;
        check_field_count(&fields, line_number)?;
        let mut values = [0i32; 6];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse::<i32>().map_err(|e| SensingError::Csv {
                line: line_number,
                reason: format!("{field:?}: {e}"),
            })?;
        }
        Ok(Self::new(
            DualSample::new(
                RawVector::new(values[0], values[1], values[2]),
                RawVector::new(values[3], values[4], values[5]),
            ),
            parse_label(fields[6], line_number)?,
        ))
    }
}

impl CaptureRow<f64> {
    /// Parse a capture line whose readings may be fractional.
    pub fn parse_f64(line: &str, line_number: usize) -> Result<Self> {
        let fields = split_fields(line, line_number)?;
        check_field_count(&fields, line_number)?;
        let mut values = [0f64; 6];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse::<f64>().map_err(|e| SensingError::Csv {
                line: line_number,
                reason: format!("{field:?}: {e}"),
            })?;
        }
        Ok(Self::new(
            DualSample::new(
                Vector3::new(values[0], values[1], values[2]),
                Vector3::new(values[3], values[4], values[5]),
            ),
            parse_label(fields[6], line_number)?,
        ))
    }
}

/// Raw readings and tilt angles of both devices at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRow {
    pub sample: DualSample<i32>,
    /// Touchscreen tilt, radians.
    pub touchscreen_tilt: AngleTriple,
    /// Keyboard tilt, radians.
    pub keyboard_tilt: AngleTriple,
    pub timestamp_ms: u64,
}

impl AngleRow {
    /// `;`-separated line with tilt angles in degrees, 2 decimals.
    pub fn to_csv_line(&self) -> String {
        let ts = self.touchscreen_tilt.rounded_degrees();
        let kb = self.keyboard_tilt.rounded_degrees();
        format!(
            "{};{};{};{};{};{};{};{};{};{};{};{};{}",
            self.sample.touchscreen.x,
            self.sample.touchscreen.y,
            self.sample.touchscreen.z,
            ts.roll,
            ts.pitch,
            ts.yaw,
            self.sample.keyboard.x,
            self.sample.keyboard.y,
            self.sample.keyboard.z,
            kb.roll,
            kb.pitch,
            kb.yaw,
            self.timestamp_ms,
        )
    }
}

/// Raw readings of both devices and the angle between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeRow {
    pub sample: DualSample<i32>,
    /// Angle between the two gravity vectors, radians.
    pub angle: f64,
}

impl HingeRow {
    /// Fails with [`SensingError::DegenerateVector`] if either reading is zero.
    pub fn from_sample(sample: DualSample<i32>) -> Result<Self> {
        let angle = angle_between(&sample.touchscreen.as_f64(), &sample.keyboard.as_f64())?;
        Ok(Self { sample, angle })
    }

    /// `;`-separated line with the angle in degrees, 2 decimals.
    pub fn to_csv_line(&self) -> String {
        let degrees = round2(to_degrees(self.angle));
        format!("{};{};{}", self.sample.touchscreen, self.sample.keyboard, degrees)
    }
}

/// Filter a recorded capture with a fresh [`FilterBank`].
///
/// Accepts `;` or whitespace separated input, skips the first line when
/// `has_header` is set and ignores blank lines. Readings are smoothed per
/// device, rounded to integers and written joined by `out_sep`.
pub fn filter_recording(
    input: &str,
    has_header: bool,
    config: FilterConfig,
    out_sep: char,
) -> Result<Vec<String>> {
    let mut bank = FilterBank::new(config);
    let mut out = Vec::new();
    let mut skip_header = has_header;

    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if skip_header {
            skip_header = false;
            continue;
        }
        let row = CaptureRow::parse_f64(line, index + 1)?;
        let filtered = bank.apply_dual(&row.sample);
        let rounded = CaptureRow::new(
            DualSample::new(
                filtered.touchscreen.map(round_to_count),
                filtered.keyboard.map(round_to_count),
            ),
            row.is_tablet,
        );
        out.push(rounded.to_csv_line(out_sep));
    }

    debug!(rows = out.len(), "filtered recording");
    Ok(out)
}

// Halves go to the even neighbour, matching existing filtered datasets.
fn round_to_count(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Fields of one line. A single trailing `;` is tolerated; any other
/// empty field is an error, never skipped.
fn split_fields(line: &str, line_number: usize) -> Result<Vec<&str>> {
    if !line.contains(CAPTURE_SEPARATOR) {
        return Ok(line.split_whitespace().collect());
    }
    let mut fields: Vec<&str> = line.split(CAPTURE_SEPARATOR).map(str::trim).collect();
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if let Some(column) = fields.iter().position(|f| f.is_empty()) {
        return Err(SensingError::Csv {
            line: line_number,
            reason: format!("empty field in column {}", column + 1),
        });
    }
    Ok(fields)
}

fn check_field_count(fields: &[&str], line_number: usize) -> Result<()> {
    if fields.len() != CAPTURE_FIELDS {
        return Err(SensingError::Csv {
            line: line_number,
            reason: format!("expected {CAPTURE_FIELDS} fields, found {}", fields.len()),
        });
    }
    Ok(())
}

/// Tablet label in any of the forms written by the capture tools.
pub fn parse_label(field: &str, line_number: usize) -> Result<bool> {
    match field.trim() {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        other => match other.parse::<f64>() {
            Ok(value) if value == 1.0 => Ok(true),
            Ok(value) if value == 0.0 => Ok(false),
            _ => Err(SensingError::Csv {
                line: line_number,
                reason: format!("invalid is_tablet label {other:?}"),
            }),
        },
    }
}
