//! Monthly filtering and summaries over attendance records.

use std::collections::{BTreeSet, HashMap};

use crate::model::attendance::AttendanceRecord;
use crate::model::summary::{MonthlyReport, MonthlySummary};
use crate::timesheet::time::{ZERO_DURATION_LABEL, calculate_working_minutes, format_minutes_to_hours};

/// Records of one `YYYY-MM` month, oldest first.
///
/// ISO dates are fixed width, so prefix matching and lexicographic order
/// agree with the calendar.
pub fn filter_month(records: &[AttendanceRecord], month: &str) -> Vec<AttendanceRecord> {
    let mut filtered: Vec<AttendanceRecord> = records
        .iter()
        .filter(|record| record.date.starts_with(month))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| a.date.cmp(&b.date));
    filtered
}

pub fn summarize(records: &[AttendanceRecord]) -> MonthlySummary {
    let day_count = records.iter().filter(|record| record.is_complete()).count();
    let total_minutes: u32 = records
        .iter()
        .map(|record| {
            calculate_working_minutes(record.clock_in.as_deref(), record.clock_out.as_deref())
        })
        .sum();

    let average_minutes = (day_count > 0)
        .then(|| (f64::from(total_minutes) / day_count as f64).round() as u32);

    MonthlySummary {
        day_count,
        total_minutes,
        average_minutes,
        total_label: format_minutes_to_hours(total_minutes),
        average_label: average_minutes
            .map(format_minutes_to_hours)
            .unwrap_or_else(|| ZERO_DURATION_LABEL.to_string()),
    }
}

/// Distinct months present in `records`, most recent first.
pub fn available_months(records: &[AttendanceRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(AttendanceRecord::month_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .map(str::to_string)
        .collect()
}

pub fn monthly_report(records: &[AttendanceRecord], month: &str) -> MonthlyReport {
    let filtered = filter_month(records, month);
    let summary = summarize(&filtered);

    MonthlyReport {
        month: month.to_string(),
        records: filtered,
        summary,
        available_months: available_months(records),
    }
}

/// The most recent record saved for `date`.
pub fn find_by_date<'a>(records: &'a [AttendanceRecord], date: &str) -> Option<&'a AttendanceRecord> {
    records.iter().rfind(|record| record.date == date)
}

/// Collapses repeated dates to their last record, keeping the slot of the
/// first occurrence.
pub fn latest_per_date(records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut latest: Vec<AttendanceRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.date) {
            Some(&slot) => latest[slot] = record,
            None => {
                slots.insert(record.date.clone(), latest.len());
                latest.push(record);
            }
        }
    }
    latest
}
