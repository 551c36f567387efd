//! Medication and medication schedule models and DTOs.

use chrono::NaiveDate;
use dosemate_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A medication a user has added.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Medication {
    pub id: EntityId,
    pub user_id: EntityId,
    pub brand_name: String,
    pub generic_name: Option<String>,
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub indications: Option<String>,
    pub purpose: Option<String>,
    pub created_at: Timestamp,
}

/// When and how a medication is taken.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct MedicationSchedule {
    pub id: EntityId,
    pub medication_id: EntityId,
    pub user_id: EntityId,
    pub frequency: String,
    /// 12-hour dose times, e.g. `"8:00 AM"`.
    pub time_of_day: Vec<String>,
    /// Full weekday names.
    pub days: Vec<String>,
    pub quantity: Option<String>,
    pub strength: Option<String>,
    pub as_needed: bool,
    pub food_instructions: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
}

/// A medication together with its schedules, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationWithSchedules {
    #[serde(flatten)]
    pub medication: Medication,
    pub schedules: Vec<MedicationSchedule>,
}

/// A schedule joined with the name of its medication, for building reminders.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReminderSchedule {
    pub schedule_id: EntityId,
    pub medication_name: String,
    pub time_of_day: Vec<String>,
    pub days: Vec<String>,
    pub quantity: Option<String>,
    pub strength: Option<String>,
    pub food_instructions: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl ReminderSchedule {
    pub fn from_schedule(schedule: &MedicationSchedule, medication_name: &str) -> Self {
        Self {
            schedule_id: schedule.id,
            medication_name: medication_name.to_string(),
            time_of_day: schedule.time_of_day.clone(),
            days: schedule.days.clone(),
            quantity: schedule.quantity.clone(),
            strength: schedule.strength.clone(),
            food_instructions: schedule.food_instructions.clone(),
            start_date: schedule.start_date,
            end_date: schedule.end_date,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// The medicine picked in the app.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedication {
    pub brand_name: String,
    pub generic_name: Option<String>,
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub indications: Option<String>,
    pub purpose: Option<String>,
}

/// Schedule details entered in the app.
///
/// Field names follow the mobile client's payload, which mixes cases.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSchedule {
    /// Defaults to today (UTC).
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: String,
    pub times: Option<Vec<String>>,
    /// Defaults to Monday through Friday.
    pub days: Option<Vec<String>>,
    pub quantity: Option<String>,
    pub strength: Option<String>,
    #[serde(default, rename = "asNeeded")]
    pub as_needed: bool,
    #[serde(rename = "foodInstructions")]
    pub food_instructions: Option<String>,
}

/// Request body for `POST /users/{user_id}/medications`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserMedication {
    #[serde(rename = "selectedMedicine")]
    pub medicine: CreateMedication,
    #[serde(rename = "medDetails")]
    pub schedule: CreateSchedule,
}

impl CreateUserMedication {
    /// A daily medication with the given dose times and default days.
    pub fn daily(brand_name: impl Into<String>, times: &[&str]) -> Self {
        Self {
            medicine: CreateMedication {
                brand_name: brand_name.into(),
                generic_name: None,
                dosage: None,
                manufacturer: None,
                indications: None,
                purpose: None,
            },
            schedule: CreateSchedule {
                start_date: None,
                end_date: None,
                frequency: "daily".to_string(),
                times: Some(times.iter().map(|t| t.to_string()).collect()),
                days: None,
                quantity: None,
                strength: None,
                as_needed: false,
                food_instructions: None,
            },
        }
    }
}
