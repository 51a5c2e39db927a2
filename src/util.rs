use crate::error::{GridError, Result};
use crate::model::DateRange;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use std::time::{Duration, SystemTime};

/// Day labels in Sunday-first order, matching `Weekday::num_days_from_sunday`.
pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn day_label(day: Weekday) -> &'static str {
    DAY_LABELS[day.num_days_from_sunday() as usize]
}

pub fn parse_week_start(label: &str) -> Result<Weekday> {
    DAY_LABELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(label))
        .map(|idx| WEEKDAYS[idx])
        .ok_or_else(|| {
            GridError::InvalidArgument(format!(
                "Unknown week start day '{label}' (expected one of {})",
                DAY_LABELS.join(", ")
            ))
        })
}

/// Offset of `day` within the 7-day cycle that begins at `start`.
pub fn days_from_week_start(day: Weekday, start: Weekday) -> u32 {
    (7 + day.num_days_from_sunday() - start.num_days_from_sunday()) % 7
}

/// The `n`-th day of the cycle that begins at `start`.
pub fn nth_day_from(start: Weekday, n: u32) -> Weekday {
    WEEKDAYS[((start.num_days_from_sunday() + n) % 7) as usize]
}

pub fn resolve_range(since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
    let mut range = DateRange::new();

    let since_dt = match since {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let until_dt = match until {
        Some(u) => Some(parse_date(u)?),
        None => None,
    };

    if let (Some(s), Some(u)) = (since_dt, until_dt) {
        if u < s {
            return Err(GridError::InvalidRange(format!(
                "until ({u}) precedes since ({s})"
            )));
        }
    }

    if let Some(s) = since_dt {
        range = range.with_since(s);
    }
    if let Some(u) = until_dt {
        range = range.with_until(u);
    }

    Ok(range)
}

/// Parse a record timestamp under the caller-supplied chrono format.
/// Tries offset-aware first, then naive datetime, then a bare date at
/// midnight UTC.
pub fn parse_timestamp(value: &str, format: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(value, format) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Ok(Utc.from_utc_datetime(&dt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, format) {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    Err(GridError::MalformedTimestamp(format!(
        "'{value}' does not match format '{format}'"
    )))
}

/// Parse a CLI date bound: RFC3339, YYYY-MM-DD, or natural language
/// ("2 weeks ago").
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    // Relative duration (e.g., "90 days ago")
    if let Some(duration) = parse_natural_duration(input) {
        let now = SystemTime::now();
        let target = now
            .checked_sub(duration)
            .ok_or_else(|| GridError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(DateTime::<Utc>::from(target));
    }

    Err(GridError::InvalidDate(format!("Invalid date '{input}'")))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    if let Some(days) = input.strip_suffix(" days ago") {
        if let Ok(n) = days.trim().parse::<u64>() {
            return Some(Duration::from_secs(n * 86400));
        }
    }

    if let Some(weeks) = input.strip_suffix(" weeks ago") {
        if let Ok(n) = weeks.trim().parse::<u64>() {
            return Some(Duration::from_secs(n * 7 * 86400));
        }
    }

    if let Some(months) = input.strip_suffix(" months ago") {
        if let Ok(n) = months.trim().parse::<u64>() {
            return Some(Duration::from_secs(n * 30 * 86400));
        }
    }

    None
}
