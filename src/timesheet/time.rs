//! Arithmetic over `HH:MM` time-of-day strings.

/// Label shown for the monthly average when no day has both clock times.
pub const ZERO_DURATION_LABEL: &str = "0時間00分";

/// Converts `HH:MM` into minutes since midnight.
///
/// Returns `None` unless both parts are plain digits within a 24-hour day.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (hour, minute) = value.trim().split_once(':')?;
    let hour = digits(hour).filter(|hour| *hour < 24)?;
    let minute = digits(minute).filter(|minute| *minute < 60)?;
    Some(hour * 60 + minute)
}

// `u32::from_str` also takes a leading `+`
fn digits(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Worked minutes between clock-in and clock-out.
///
/// Missing or malformed times, equal times and clock-outs earlier than the
/// clock-in (overnight shifts) all count as zero.
pub fn calculate_working_minutes(clock_in: Option<&str>, clock_out: Option<&str>) -> u32 {
    let (Some(start), Some(end)) = (clock_in.and_then(parse_hhmm), clock_out.and_then(parse_hhmm))
    else {
        return 0;
    };

    if end <= start {
        return 0;
    }

    end - start
}

/// Renders minutes as `HH時間MM分`.
pub fn format_minutes_to_hours(minutes: u32) -> String {
    format!("{:02}時間{:02}分", minutes / 60, minutes % 60)
}

/// Label for the daily page; `None` until there is a positive duration.
pub fn working_hours_label(clock_in: Option<&str>, clock_out: Option<&str>) -> Option<String> {
    match calculate_working_minutes(clock_in, clock_out) {
        0 => None,
        minutes => Some(format_minutes_to_hours(minutes)),
    }
}
