//! Turns backend shift objects into [`AttendanceRecord`]s.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::warn;

use crate::model::attendance::{AttendanceRecord, ShiftInput};
use crate::model::shift::RawShift;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a backend timestamp into wall-clock time at `offset`.
///
/// RFC 3339 values are converted; naive values are taken as already local.
pub fn parse_timestamp(value: &str, offset: &FixedOffset) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(offset).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Normalizes a single backend shift.
///
/// Returns `None` when neither timestamp can be parsed, since the record
/// cannot be placed on a day.
pub fn normalize_shift(raw: &RawShift, offset: &FixedOffset) -> Option<AttendanceRecord> {
    let start = raw
        .start_time
        .as_deref()
        .and_then(|value| parse_timestamp(value, offset));
    let end = raw
        .end_time
        .as_deref()
        .and_then(|value| parse_timestamp(value, offset));

    let day = start.or(end)?.date();

    Some(AttendanceRecord {
        date: day.format("%Y-%m-%d").to_string(),
        clock_in: start.map(|at| at.format("%H:%M").to_string()),
        clock_out: end.map(|at| at.format("%H:%M").to_string()),
        work_content: raw.work_content.clone().unwrap_or_default(),
        concerns: raw.issues.clone().unwrap_or_default(),
    })
}

/// Normalizes either shape; normalized input passes through unchanged.
pub fn normalize(input: ShiftInput, offset: &FixedOffset) -> Option<AttendanceRecord> {
    match input {
        ShiftInput::Normalized(record) => Some(record),
        ShiftInput::Raw(raw) => normalize_shift(&raw, offset),
    }
}

pub fn normalize_all(inputs: Vec<ShiftInput>, offset: &FixedOffset) -> Vec<AttendanceRecord> {
    inputs
        .into_iter()
        .filter_map(|input| {
            let record = normalize(input.clone(), offset);
            if record.is_none() {
                warn!(?input, "Dropping shift without a usable timestamp");
            }
            record
        })
        .collect()
}
