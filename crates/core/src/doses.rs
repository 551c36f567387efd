//! Dose log statuses and reminder timing rules.

use chrono::Duration;

use crate::types::Timestamp;

/// Dose is scheduled and not yet acted on.
pub const STATUS_PENDING: &str = "pending";
/// Dose was taken.
pub const STATUS_TAKEN: &str = "taken";
/// Dose was pushed back by the user.
pub const STATUS_SNOOZED: &str = "snoozed";
/// Dose was not taken.
pub const STATUS_MISSED: &str = "missed";

/// All valid dose statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_TAKEN, STATUS_SNOOZED, STATUS_MISSED];

/// How far a snooze pushes the scheduled time.
pub const SNOOZE_MINUTES: i64 = 15;

/// Scheduled time after one snooze.
pub fn snoozed_time(scheduled_time: Timestamp) -> Timestamp {
    scheduled_time + Duration::minutes(SNOOZE_MINUTES)
}

/// A dose is overdue when still pending after its scheduled time.
pub fn is_overdue(status: &str, scheduled_time: Timestamp, now: Timestamp) -> bool {
    status == STATUS_PENDING && now > scheduled_time
}

/// Whether a dose can still be snoozed; taken doses stay where they are.
pub fn can_snooze(status: &str) -> bool {
    status != STATUS_TAKEN
}
