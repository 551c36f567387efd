//! Postgres-backed store for users, progress entries, medications, and dose logs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use dosemate_core::doses::{STATUS_PENDING, STATUS_SNOOZED, STATUS_TAKEN, SNOOZE_MINUTES};
use dosemate_core::error::CoreError;
use dosemate_core::medicines::validate_brand_name;
use dosemate_core::progress::prepare_new_entry;
use dosemate_core::schedules::prepare_schedule;
use dosemate_core::types::{new_id, EntityId, Timestamp};
use dosemate_core::users::{validate_email, DEFAULT_AUTH_PROVIDER};

use crate::error::StoreError;
use crate::models::dose::DoseLog;
use crate::models::medication::{
    CreateUserMedication, Medication, MedicationSchedule, MedicationWithSchedules,
    ReminderSchedule,
};
use crate::models::progress::{CreateProgressEntry, ProgressEntry, ProgressQuery};
use crate::models::user::{CreateUser, User};
use crate::store::{DoseStore, MedicationStore, ProgressStore, UserStore};
use crate::DbPool;

/// Column list for `progress_entries` SELECT queries.
const PROGRESS_COLUMNS: &str = "id, user_id, metric_name, value, int_value, created_at";

/// Column list for `users` SELECT queries.
const USER_COLUMNS: &str = "\
    id, email, name, picture, auth_provider, is_active, \
    created_at, updated_at";

/// Column list for `medications` SELECT queries.
const MEDICATION_COLUMNS: &str = "\
    id, user_id, brand_name, generic_name, dosage, manufacturer, \
    indications, purpose, created_at";

/// Column list for `medication_schedules` SELECT queries.
const SCHEDULE_COLUMNS: &str = "\
    id, medication_id, user_id, frequency, time_of_day, days, quantity, \
    strength, as_needed, food_instructions, start_date, end_date, created_at";

/// Column list for `dose_logs` SELECT queries.
const DOSE_COLUMNS: &str = "\
    id, schedule_id, user_id, slot_time, scheduled_time, taken_at, status, created_at";

/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Store backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_dose(
        &self,
        user_id: EntityId,
        dose_id: EntityId,
    ) -> Result<Option<DoseLog>, StoreError> {
        let sql = format!("SELECT {DOSE_COLUMNS} FROM dose_logs WHERE id = $1 AND user_id = $2");
        let dose = sqlx::query_as::<_, DoseLog>(&sql)
            .bind(dose_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dose)
    }
}

/// Return the SQLSTATE code of a database error, if any.
fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Map a foreign key violation on a user-owned insert to `NotFound`.
fn user_fk_violation(err: sqlx::Error, user_id: EntityId) -> StoreError {
    if sqlstate(&err).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        tracing::debug!(%user_id, error = %err, "Insert rejected by user foreign key");
        CoreError::NotFound {
            entity: "User",
            id: user_id,
        }
        .into()
    } else {
        err.into()
    }
}

fn dose_not_found(dose_id: EntityId) -> StoreError {
    CoreError::NotFound {
        entity: "DoseLog",
        id: dose_id,
    }
    .into()
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[async_trait]
impl ProgressStore for PgStore {
    async fn list(
        &self,
        user_id: EntityId,
        query: &ProgressQuery,
    ) -> Result<Vec<ProgressEntry>, StoreError> {
        // `$2 IS NULL` keeps a single statement for the filtered and unfiltered case.
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress_entries \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR metric_name = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        let entries = sqlx::query_as::<_, ProgressEntry>(&sql)
            .bind(user_id)
            .bind(query.metric_name.as_deref())
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(
            %user_id,
            metric_name = ?query.metric_name,
            limit = query.limit,
            count = entries.len(),
            "Listed progress entries",
        );
        Ok(entries)
    }

    async fn create(
        &self,
        user_id: EntityId,
        input: &CreateProgressEntry,
    ) -> Result<ProgressEntry, StoreError> {
        let new = prepare_new_entry(input.metric_name.as_deref(), input.value, input.int_value)?;

        let sql = format!(
            "INSERT INTO progress_entries (id, user_id, metric_name, value, int_value) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PROGRESS_COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ProgressEntry>(&sql)
            .bind(new_id())
            .bind(user_id)
            .bind(&new.metric_name)
            .bind(new.value)
            .bind(new.int_value)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| user_fk_violation(err, user_id))?;
        Ok(entry)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserStore for PgStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        validate_email(&input.email).map_err(CoreError::Validation)?;

        let sql = format!(
            "INSERT INTO users (id, email, name, picture, auth_provider) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(new_id())
            .bind(&input.email)
            .bind(input.name.as_deref())
            .bind(input.picture.as_deref())
            .bind(input.auth_provider.as_deref().unwrap_or(DEFAULT_AUTH_PROVIDER))
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(err) if sqlstate(&err).as_deref() == Some(UNIQUE_VIOLATION) => {
                tracing::debug!(email = %input.email, "User insert hit uq_users_email");
                Err(CoreError::Conflict(format!(
                    "A user with email '{}' already exists",
                    input.email
                ))
                .into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Medications
// ---------------------------------------------------------------------------

#[async_trait]
impl MedicationStore for PgStore {
    async fn list(&self, user_id: EntityId) -> Result<Vec<MedicationWithSchedules>, StoreError> {
        let sql = format!(
            "SELECT {MEDICATION_COLUMNS} FROM medications \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let medications = sqlx::query_as::<_, Medication>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM medication_schedules \
             WHERE user_id = $1 ORDER BY created_at, id"
        );
        let schedules = sqlx::query_as::<_, MedicationSchedule>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let mut by_medication: HashMap<EntityId, Vec<MedicationSchedule>> = HashMap::new();
        for schedule in schedules {
            by_medication
                .entry(schedule.medication_id)
                .or_default()
                .push(schedule);
        }

        Ok(medications
            .into_iter()
            .map(|medication| MedicationWithSchedules {
                schedules: by_medication.remove(&medication.id).unwrap_or_default(),
                medication,
            })
            .collect())
    }

    async fn create(
        &self,
        user_id: EntityId,
        input: &CreateUserMedication,
        today: NaiveDate,
    ) -> Result<MedicationWithSchedules, StoreError> {
        let medicine = &input.medicine;
        let details = &input.schedule;
        validate_brand_name(&medicine.brand_name).map_err(CoreError::Validation)?;
        let new = prepare_schedule(
            &details.frequency,
            details.times.as_deref(),
            details.days.as_deref(),
            details.start_date,
            details.end_date,
            today,
        )?;

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO medications \
                (id, user_id, brand_name, generic_name, dosage, manufacturer, indications, purpose) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {MEDICATION_COLUMNS}"
        );
        let medication = sqlx::query_as::<_, Medication>(&sql)
            .bind(new_id())
            .bind(user_id)
            .bind(&medicine.brand_name)
            .bind(medicine.generic_name.as_deref())
            .bind(medicine.dosage.as_deref())
            .bind(medicine.manufacturer.as_deref())
            .bind(medicine.indications.as_deref())
            .bind(medicine.purpose.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| user_fk_violation(err, user_id))?;

        let sql = format!(
            "INSERT INTO medication_schedules \
                (id, medication_id, user_id, frequency, time_of_day, days, quantity, \
                 strength, as_needed, food_instructions, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {SCHEDULE_COLUMNS}"
        );
        let schedule = sqlx::query_as::<_, MedicationSchedule>(&sql)
            .bind(new_id())
            .bind(medication.id)
            .bind(user_id)
            .bind(&new.frequency)
            .bind(&new.times)
            .bind(&new.days)
            .bind(details.quantity.as_deref())
            .bind(details.strength.as_deref())
            .bind(details.as_needed)
            .bind(details.food_instructions.as_deref())
            .bind(new.start_date)
            .bind(new.end_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MedicationWithSchedules {
            medication,
            schedules: vec![schedule],
        })
    }

    async fn delete(&self, user_id: EntityId, medication_id: EntityId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM medications WHERE id = $1 AND user_id = $2")
            .bind(medication_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reminder_schedules(
        &self,
        user_id: EntityId,
    ) -> Result<Vec<ReminderSchedule>, StoreError> {
        let schedules = sqlx::query_as::<_, ReminderSchedule>(
            "SELECT s.id AS schedule_id, m.brand_name AS medication_name, \
                    s.time_of_day, s.days, s.quantity, s.strength, s.food_instructions, \
                    s.start_date, s.end_date \
             FROM medication_schedules s \
             JOIN medications m ON m.id = s.medication_id \
             WHERE s.user_id = $1 \
             ORDER BY s.created_at, s.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }
}

// ---------------------------------------------------------------------------
// Dose logs
// ---------------------------------------------------------------------------

#[async_trait]
impl DoseStore for PgStore {
    async fn get_or_create(
        &self,
        user_id: EntityId,
        schedule_id: EntityId,
        slot_time: Timestamp,
    ) -> Result<DoseLog, StoreError> {
        // Concurrent callers race on uq_dose_logs_schedule_slot; the loser reads the winner's row.
        sqlx::query(
            "INSERT INTO dose_logs (id, schedule_id, user_id, slot_time, scheduled_time, status) \
             VALUES ($1, $2, $3, $4, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_dose_logs_schedule_slot DO NOTHING",
        )
        .bind(new_id())
        .bind(schedule_id)
        .bind(user_id)
        .bind(slot_time)
        .bind(STATUS_PENDING)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if sqlstate(&err).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                StoreError::Core(CoreError::NotFound {
                    entity: "MedicationSchedule",
                    id: schedule_id,
                })
            } else {
                err.into()
            }
        })?;

        let sql = format!(
            "SELECT {DOSE_COLUMNS} FROM dose_logs WHERE schedule_id = $1 AND slot_time = $2"
        );
        let dose = sqlx::query_as::<_, DoseLog>(&sql)
            .bind(schedule_id)
            .bind(slot_time)
            .fetch_one(&self.pool)
            .await?;
        Ok(dose)
    }

    async fn mark_taken(
        &self,
        user_id: EntityId,
        dose_id: EntityId,
        now: Timestamp,
    ) -> Result<DoseLog, StoreError> {
        let sql = format!(
            "UPDATE dose_logs SET status = $3, taken_at = COALESCE(taken_at, $4) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {DOSE_COLUMNS}"
        );
        sqlx::query_as::<_, DoseLog>(&sql)
            .bind(dose_id)
            .bind(user_id)
            .bind(STATUS_TAKEN)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| dose_not_found(dose_id))
    }

    async fn snooze(&self, user_id: EntityId, dose_id: EntityId) -> Result<DoseLog, StoreError> {
        let sql = format!(
            "UPDATE dose_logs \
             SET status = $3, scheduled_time = scheduled_time + $4::INTERVAL \
             WHERE id = $1 AND user_id = $2 AND status <> $5 \
             RETURNING {DOSE_COLUMNS}"
        );
        let snoozed = sqlx::query_as::<_, DoseLog>(&sql)
            .bind(dose_id)
            .bind(user_id)
            .bind(STATUS_SNOOZED)
            .bind(Duration::minutes(SNOOZE_MINUTES))
            .bind(STATUS_TAKEN)
            .fetch_optional(&self.pool)
            .await?;

        match snoozed {
            Some(dose) => Ok(dose),
            None => match self.find_dose(user_id, dose_id).await? {
                Some(_) => {
                    tracing::warn!(%dose_id, "Snooze requested for a dose already taken");
                    Err(CoreError::Conflict("Dose has already been taken".to_string()).into())
                }
                None => Err(dose_not_found(dose_id)),
            },
        }
    }
}
