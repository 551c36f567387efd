//! Progress entry entity model and DTOs.

use dosemate_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single recorded metric measurement for a user at a point in time.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: EntityId,
    pub user_id: EntityId,
    pub metric_name: String,
    pub value: f64,
    pub int_value: Option<i64>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a progress entry.
///
/// Required fields are optional here so that a missing field surfaces as a
/// validation error from the store instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProgressEntry {
    pub metric_name: Option<String>,
    pub value: Option<f64>,
    pub int_value: Option<i64>,
}

/// Resolved list parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressQuery {
    /// Only return entries with exactly this metric name.
    pub metric_name: Option<String>,
    /// Maximum number of entries to return (already resolved and clamped).
    pub limit: i64,
}

impl Default for ProgressQuery {
    fn default() -> Self {
        Self {
            metric_name: None,
            limit: dosemate_core::progress::DEFAULT_PROGRESS_LIMIT,
        }
    }
}
