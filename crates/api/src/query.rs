//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;

/// Query parameters for `GET /users/{user_id}/progress`.
///
/// `limit` is kept as raw text so that an unparsable value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, PartialEq)]
pub struct ProgressListParams {
    pub metric_name: Option<String>,
    pub limit: Option<String>,
}

impl ProgressListParams {
    /// Collect the parameters from raw query pairs, ignoring unknown keys.
    ///
    /// A `limit` given more than once with different values is treated as
    /// unusable and left for the default. A `metric_name` given more than once
    /// with different values is rejected, since no single filter applies.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut params = Self::default();
        let mut limit_conflict = false;

        for (key, value) in pairs {
            match key.as_str() {
                "metric_name" => match &params.metric_name {
                    Some(existing) if *existing != value => {
                        return Err(AppError::BadRequest(
                            "metric_name was given more than once with different values"
                                .to_string(),
                        ));
                    }
                    _ => params.metric_name = Some(value),
                },
                "limit" => match &params.limit {
                    Some(existing) if *existing != value => limit_conflict = true,
                    _ => params.limit = Some(value),
                },
                _ => {}
            }
        }

        if limit_conflict {
            params.limit = None;
        }
        Ok(params)
    }
}

/// Query parameters for `GET /users/{user_id}/reminders/today`.
#[derive(Debug, Default, Deserialize)]
pub struct ReminderParams {
    /// Day to list reminders for (`YYYY-MM-DD`). Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}
