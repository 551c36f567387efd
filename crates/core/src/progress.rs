//! Progress entry constants, validation, and list-limit resolution.
//!
//! A progress entry is one recorded measurement (`metric_name`, `value`,
//! optional `int_value`) for a user at a point in time. The checks here are
//! shared by every store implementation so they reject the same inputs.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of entries returned by a list query when no usable limit is given.
pub const DEFAULT_PROGRESS_LIMIT: i64 = 50;

/// Upper bound on the number of entries a single list query may return.
pub const MAX_PROGRESS_LIMIT: i64 = 500;

/// Maximum length of a metric name in characters (matches the column width).
pub const MAX_METRIC_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a metric name: must be present, non-blank, and within the length limit.
pub fn validate_metric_name(metric_name: Option<&str>) -> Result<&str, String> {
    let name = metric_name.ok_or_else(|| "metric_name is required".to_string())?;
    if name.trim().is_empty() {
        return Err("metric_name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_METRIC_NAME_LENGTH {
        return Err(format!(
            "metric_name exceeds maximum length of {MAX_METRIC_NAME_LENGTH} characters"
        ));
    }
    Ok(name)
}

/// Validate a measurement value: must be present and finite.
pub fn validate_value(value: Option<f64>) -> Result<f64, String> {
    match value {
        None => Err("value is required".to_string()),
        Some(v) if !v.is_finite() => Err("value must be a finite number".to_string()),
        Some(v) => Ok(v),
    }
}

/// A progress entry that passed validation and is ready to be persisted.
///
/// `int_value` is carried through untouched: it is not checked against `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProgressEntry {
    pub metric_name: String,
    pub value: f64,
    pub int_value: Option<i64>,
}

/// Validate the raw create fields and build a [`NewProgressEntry`].
pub fn prepare_new_entry(
    metric_name: Option<&str>,
    value: Option<f64>,
    int_value: Option<i64>,
) -> Result<NewProgressEntry, CoreError> {
    let metric_name = validate_metric_name(metric_name).map_err(CoreError::Validation)?;
    let value = validate_value(value).map_err(CoreError::Validation)?;

    Ok(NewProgressEntry {
        metric_name: metric_name.to_string(),
        value,
        int_value,
    })
}

// ---------------------------------------------------------------------------
// Limit resolution
// ---------------------------------------------------------------------------

/// Resolve the raw `limit` query value into an effective limit.
///
/// Absent, unparsable, zero, or negative values fall back to
/// [`DEFAULT_PROGRESS_LIMIT`]. Values above [`MAX_PROGRESS_LIMIT`] are clamped.
pub fn resolve_limit(raw: Option<&str>) -> i64 {
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        Some(n) if n >= 1 => n.min(MAX_PROGRESS_LIMIT),
        _ => DEFAULT_PROGRESS_LIMIT,
    }
}

/// Normalize an optional metric-name filter: blank filters are treated as absent.
pub fn normalize_metric_filter(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty()).map(str::to_string)
}
