//! Store abstraction.
//!
//! Two implementations live here: [`pg::PgStore`] (durable, sqlx/Postgres)
//! and [`memory::MemoryStore`] (process-local). Both are shared behind
//! `Arc<dyn …>` in the HTTP layer.

use async_trait::async_trait;
use chrono::NaiveDate;
use dosemate_core::types::{EntityId, Timestamp};

use crate::error::StoreError;
use crate::models::dose::DoseLog;
use crate::models::medication::{CreateUserMedication, MedicationWithSchedules, ReminderSchedule};
use crate::models::progress::{CreateProgressEntry, ProgressEntry, ProgressQuery};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod pg;

/// Read/write access to progress entries.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// List a user's entries, newest first, optionally filtered by metric name
    /// and truncated to `query.limit`.
    ///
    /// A user with no entries (or an unknown user) yields an empty list.
    async fn list(
        &self,
        user_id: EntityId,
        query: &ProgressQuery,
    ) -> Result<Vec<ProgressEntry>, StoreError>;

    /// Validate and persist a new entry, assigning its `id` and `created_at`.
    ///
    /// Fails with `CoreError::Validation` when `metric_name` or `value` is
    /// missing or invalid, and `CoreError::NotFound` when the user does not exist.
    async fn create(
        &self,
        user_id: EntityId,
        input: &CreateProgressEntry,
    ) -> Result<ProgressEntry, StoreError>;

    /// Confirm the backing storage is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Read access to users, plus creation for provisioning.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, most recently created first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Duplicate emails fail with `CoreError::Conflict`.
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;
}

/// A user's medications and their schedules.
#[async_trait]
pub trait MedicationStore: Send + Sync {
    /// A user's medications with their schedules, most recently added first.
    async fn list(&self, user_id: EntityId) -> Result<Vec<MedicationWithSchedules>, StoreError>;

    /// Insert a medication and its schedule together.
    ///
    /// `today` is the start date used when the schedule gives none. Fails
    /// with `CoreError::Validation` for a bad schedule and
    /// `CoreError::NotFound` when the user does not exist.
    async fn create(
        &self,
        user_id: EntityId,
        input: &CreateUserMedication,
        today: NaiveDate,
    ) -> Result<MedicationWithSchedules, StoreError>;

    /// Delete a medication with its schedules and dose logs.
    ///
    /// Returns `false` when the user has no medication with that id.
    async fn delete(&self, user_id: EntityId, medication_id: EntityId) -> Result<bool, StoreError>;

    /// Every schedule of the user, joined with its medication name.
    async fn reminder_schedules(&self, user_id: EntityId)
        -> Result<Vec<ReminderSchedule>, StoreError>;
}

/// Per-slot dose state.
#[async_trait]
pub trait DoseStore: Send + Sync {
    /// The log for `(schedule_id, slot_time)`, created as pending if absent.
    async fn get_or_create(
        &self,
        user_id: EntityId,
        schedule_id: EntityId,
        slot_time: Timestamp,
    ) -> Result<DoseLog, StoreError>;

    /// Mark a dose taken at `now`. Taking it again keeps the first `taken_at`.
    async fn mark_taken(
        &self,
        user_id: EntityId,
        dose_id: EntityId,
        now: Timestamp,
    ) -> Result<DoseLog, StoreError>;

    /// Push a dose back by the snooze interval.
    ///
    /// Fails with `CoreError::Conflict` when the dose was already taken.
    async fn snooze(&self, user_id: EntityId, dose_id: EntityId) -> Result<DoseLog, StoreError>;
}
