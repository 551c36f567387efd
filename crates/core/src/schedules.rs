//! Medication schedule rules: dose times, weekdays, and date ranges.
//!
//! Dose times use the 12-hour clock the mobile client sends (`"8:00 AM"`).
//! Weekdays are full English names (`"Monday"`).

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::CoreError;

/// Format of a dose time string.
pub const DOSE_TIME_FORMAT: &str = "%I:%M %p";

/// All weekday names, Monday first.
pub const WEEKDAY_NAMES: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Days applied when a schedule is created without any.
pub const DEFAULT_SCHEDULE_DAYS: &[&str] =
    &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Parse a 12-hour dose time such as `"8:00 AM"` or `"09:30 pm"`.
pub fn parse_dose_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), DOSE_TIME_FORMAT)
        .map_err(|_| format!("Invalid dose time '{raw}'. Expected a time like '8:00 AM'"))
}

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Validate the raw schedule fields supplied on creation.
pub fn validate_schedule(
    frequency: &str,
    times: &[String],
    days: &[String],
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), String> {
    if frequency.trim().is_empty() {
        return Err("frequency cannot be empty".to_string());
    }
    for time in times {
        parse_dose_time(time)?;
    }
    if let Some(day) = days.iter().find(|d| !WEEKDAY_NAMES.contains(&d.as_str())) {
        return Err(format!(
            "Invalid day '{day}'. Must be one of: {}",
            WEEKDAY_NAMES.join(", ")
        ));
    }
    if end_date.is_some_and(|end| end < start_date) {
        return Err("end_date cannot be before start_date".to_string());
    }
    Ok(())
}

/// A schedule that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchedule {
    pub frequency: String,
    pub times: Vec<String>,
    pub days: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Apply defaults (no times, weekdays only, starting `today`) and validate.
pub fn prepare_schedule(
    frequency: &str,
    times: Option<&[String]>,
    days: Option<&[String]>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<NewSchedule, CoreError> {
    let times = times.map(<[String]>::to_vec).unwrap_or_default();
    let days = days.map(<[String]>::to_vec).unwrap_or_else(|| {
        DEFAULT_SCHEDULE_DAYS.iter().map(|d| d.to_string()).collect()
    });
    let start_date = start_date.unwrap_or(today);

    validate_schedule(frequency, &times, &days, start_date, end_date)
        .map_err(CoreError::Validation)?;

    Ok(NewSchedule {
        frequency: frequency.to_string(),
        times,
        days,
        start_date,
        end_date,
    })
}

/// Whether a schedule with these days and date range has doses on `date`.
pub fn applies_on(
    days: &[String],
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    date: NaiveDate,
) -> bool {
    if date < start_date || end_date.is_some_and(|end| date > end) {
        return false;
    }
    let name = weekday_name(date.weekday());
    days.iter().any(|d| d == name)
}

/// The dose slots on `date` for the given time strings, in time order.
///
/// Times that fail to parse are skipped; they are rejected at creation, so
/// this only matters for rows written by other tools.
pub fn dose_slots_on(date: NaiveDate, times: &[String]) -> Vec<(String, NaiveDateTime)> {
    let mut slots: Vec<(String, NaiveDateTime)> = times
        .iter()
        .filter_map(|t| parse_dose_time(t).ok().map(|time| (t.clone(), date.and_time(time))))
        .collect();
    slots.sort_by_key(|(_, at)| *at);
    slots
}
