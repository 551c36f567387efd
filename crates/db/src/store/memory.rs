//! In-process store used when no database is configured, and by tests.
//!
//! All state sits behind one `RwLock`; creates take the write lock, so
//! `created_at` is assigned in insertion order and never decreases for a user.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dosemate_core::doses::{
    can_snooze, snoozed_time, STATUS_PENDING, STATUS_SNOOZED, STATUS_TAKEN,
};
use dosemate_core::error::CoreError;
use dosemate_core::medicines::validate_brand_name;
use dosemate_core::progress::prepare_new_entry;
use dosemate_core::schedules::prepare_schedule;
use dosemate_core::types::{new_id, EntityId, Timestamp};
use dosemate_core::users::{validate_email, DEFAULT_AUTH_PROVIDER};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::dose::DoseLog;
use crate::models::medication::{
    CreateUserMedication, Medication, MedicationSchedule, MedicationWithSchedules,
    ReminderSchedule,
};
use crate::models::progress::{CreateProgressEntry, ProgressEntry, ProgressQuery};
use crate::models::user::{CreateUser, User};
use crate::store::{DoseStore, MedicationStore, ProgressStore, UserStore};

#[derive(Default)]
struct Inner {
    users: HashMap<EntityId, User>,
    /// Append-only, in insertion order.
    progress: Vec<ProgressEntry>,
    /// In insertion order.
    medications: Vec<Medication>,
    schedules: Vec<MedicationSchedule>,
    doses: Vec<DoseLog>,
}

impl Inner {
    fn user_not_found(&self, user_id: EntityId) -> Option<StoreError> {
        (!self.users.contains_key(&user_id)).then(|| {
            CoreError::NotFound {
                entity: "User",
                id: user_id,
            }
            .into()
        })
    }

    fn dose_mut(
        &mut self,
        user_id: EntityId,
        dose_id: EntityId,
    ) -> Result<&mut DoseLog, StoreError> {
        self.doses
            .iter_mut()
            .find(|d| d.id == dose_id && d.user_id == user_id)
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "DoseLog",
                    id: dose_id,
                }
                .into()
            })
    }
}

/// Volatile store keeping everything in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn list(
        &self,
        user_id: EntityId,
        query: &ProgressQuery,
    ) -> Result<Vec<ProgressEntry>, StoreError> {
        let limit = usize::try_from(query.limit).unwrap_or(0);
        let inner = self.inner.read().await;

        // Insertion order is created_at order, so walking backwards is newest first.
        let entries = inner
            .progress
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .filter(|e| {
                query
                    .metric_name
                    .as_deref()
                    .map_or(true, |name| e.metric_name == name)
            })
            .take(limit)
            .cloned()
            .collect();
        Ok(entries)
    }

    async fn create(
        &self,
        user_id: EntityId,
        input: &CreateProgressEntry,
    ) -> Result<ProgressEntry, StoreError> {
        let new = prepare_new_entry(input.metric_name.as_deref(), input.value, input.int_value)?;

        let mut inner = self.inner.write().await;
        if let Some(err) = inner.user_not_found(user_id) {
            return Err(err);
        }

        // Guard against the wall clock stepping backwards between inserts.
        let latest = inner
            .progress
            .iter()
            .rev()
            .find(|e| e.user_id == user_id)
            .map(|e| e.created_at);
        let now = Utc::now();
        let created_at = latest.map_or(now, |prev| prev.max(now));

        let entry = ProgressEntry {
            id: new_id(),
            user_id,
            metric_name: new.metric_name,
            value: new.value,
            int_value: new.int_value,
            created_at,
        };
        inner.progress.push(entry.clone());
        Ok(entry)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        validate_email(&input.email).map_err(CoreError::Validation)?;

        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict(format!(
                "A user with email '{}' already exists",
                input.email
            ))
            .into());
        }

        let now = Utc::now();
        let user = User {
            id: new_id(),
            email: input.email.clone(),
            name: input.name.clone(),
            picture: input.picture.clone(),
            auth_provider: input
                .auth_provider
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTH_PROVIDER.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl MedicationStore for MemoryStore {
    async fn list(&self, user_id: EntityId) -> Result<Vec<MedicationWithSchedules>, StoreError> {
        let inner = self.inner.read().await;
        let medications = inner
            .medications
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .map(|m| MedicationWithSchedules {
                medication: m.clone(),
                schedules: inner
                    .schedules
                    .iter()
                    .filter(|s| s.medication_id == m.id)
                    .cloned()
                    .collect(),
            })
            .collect();
        Ok(medications)
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

        let mut inner = self.inner.write().await;
        if let Some(err) = inner.user_not_found(user_id) {
            return Err(err);
        }

        let now = Utc::now();
        let medication = Medication {
            id: new_id(),
            user_id,
            brand_name: medicine.brand_name.clone(),
            generic_name: medicine.generic_name.clone(),
            dosage: medicine.dosage.clone(),
            manufacturer: medicine.manufacturer.clone(),
            indications: medicine.indications.clone(),
            purpose: medicine.purpose.clone(),
            created_at: now,
        };
        let schedule = MedicationSchedule {
            id: new_id(),
            medication_id: medication.id,
            user_id,
            frequency: new.frequency,
            time_of_day: new.times,
            days: new.days,
            quantity: details.quantity.clone(),
            strength: details.strength.clone(),
            as_needed: details.as_needed,
            food_instructions: details.food_instructions.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: now,
        };
        inner.medications.push(medication.clone());
        inner.schedules.push(schedule.clone());

        Ok(MedicationWithSchedules {
            medication,
            schedules: vec![schedule],
        })
    }

    async fn delete(&self, user_id: EntityId, medication_id: EntityId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.medications.len();
        inner
            .medications
            .retain(|m| !(m.id == medication_id && m.user_id == user_id));
        if inner.medications.len() == before {
            return Ok(false);
        }

        let removed: Vec<EntityId> = inner
            .schedules
            .iter()
            .filter(|s| s.medication_id == medication_id)
            .map(|s| s.id)
            .collect();
        inner.schedules.retain(|s| s.medication_id != medication_id);
        inner.doses.retain(|d| !removed.contains(&d.schedule_id));
        Ok(true)
    }

    async fn reminder_schedules(
        &self,
        user_id: EntityId,
    ) -> Result<Vec<ReminderSchedule>, StoreError> {
        let inner = self.inner.read().await;
        let schedules = inner
            .schedules
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                inner
                    .medications
                    .iter()
                    .find(|m| m.id == s.medication_id)
                    .map(|m| ReminderSchedule::from_schedule(s, &m.brand_name))
            })
            .collect();
        Ok(schedules)
    }
}

#[async_trait]
impl DoseStore for MemoryStore {
    async fn get_or_create(
        &self,
        user_id: EntityId,
        schedule_id: EntityId,
        slot_time: Timestamp,
    ) -> Result<DoseLog, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(dose) = inner
            .doses
            .iter()
            .find(|d| d.schedule_id == schedule_id && d.slot_time == slot_time)
        {
            return Ok(dose.clone());
        }
        if !inner.schedules.iter().any(|s| s.id == schedule_id) {
            return Err(CoreError::NotFound {
                entity: "MedicationSchedule",
                id: schedule_id,
            }
            .into());
        }

        let dose = DoseLog {
            id: new_id(),
            schedule_id,
            user_id,
            slot_time,
            scheduled_time: slot_time,
            taken_at: None,
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        };
        inner.doses.push(dose.clone());
        Ok(dose)
    }

    async fn mark_taken(
        &self,
        user_id: EntityId,
        dose_id: EntityId,
        now: Timestamp,
    ) -> Result<DoseLog, StoreError> {
        let mut inner = self.inner.write().await;
        let dose = inner.dose_mut(user_id, dose_id)?;
        dose.status = STATUS_TAKEN.to_string();
        dose.taken_at.get_or_insert(now);
        Ok(dose.clone())
    }

    async fn snooze(&self, user_id: EntityId, dose_id: EntityId) -> Result<DoseLog, StoreError> {
        let mut inner = self.inner.write().await;
        let dose = inner.dose_mut(user_id, dose_id)?;
        if !can_snooze(&dose.status) {
            return Err(CoreError::Conflict("Dose has already been taken".to_string()).into());
        }
        dose.status = STATUS_SNOOZED.to_string();
        dose.scheduled_time = snoozed_time(dose.scheduled_time);
        Ok(dose.clone())
    }
}
