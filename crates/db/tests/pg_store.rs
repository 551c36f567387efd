//! Integration tests for the Postgres store.
//!
//! These run against a real database through `#[sqlx::test]`, which creates a
//! fresh database per test and applies the workspace migrations. They are
//! ignored by default; run with `DATABASE_URL=... cargo test -- --ignored`.

use assert_matches::assert_matches;
use dosemate_core::error::CoreError;
use chrono::{NaiveDate, TimeZone, Utc};
use dosemate_core::doses::{STATUS_PENDING, STATUS_SNOOZED, STATUS_TAKEN};
use dosemate_core::types::{new_id, EntityId};
use dosemate_db::models::medication::CreateUserMedication;
use dosemate_db::models::progress::{CreateProgressEntry, ProgressQuery};
use dosemate_db::models::user::CreateUser;
use dosemate_db::{DoseStore, MedicationStore, PgStore, ProgressStore, StoreError, UserStore};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(metric_name: &str, value: f64, int_value: Option<i64>) -> CreateProgressEntry {
    CreateProgressEntry {
        metric_name: Some(metric_name.to_string()),
        value: Some(value),
        int_value,
    }
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

async fn store_with_user(pool: PgPool) -> (PgStore, EntityId) {
    let store = PgStore::new(pool);
    let user = UserStore::create(&store, &CreateUser::with_email("pat@example.com"))
        .await
        .unwrap();
    (store, user.id)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_then_list_returns_same_values(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;

    let created = ProgressStore::create(&store, user_id, &entry("streak_days", 5.0, Some(5)))
        .await
        .unwrap();
    assert_eq!(created.metric_name, "streak_days");
    assert_eq!(created.value, 5.0);
    assert_eq!(created.int_value, Some(5));

    let query = ProgressQuery {
        metric_name: Some("streak_days".into()),
        ..ProgressQuery::default()
    };
    let listed = ProgressStore::list(&store, user_id, &query).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_orders_newest_first_and_honours_limit(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;
    for i in 0..4_i32 {
        ProgressStore::create(&store, user_id, &entry("doses_taken", f64::from(i), None))
            .await
            .unwrap();
    }

    let query = ProgressQuery {
        metric_name: None,
        limit: 2,
    };
    let listed = ProgressStore::list(&store, user_id, &query).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at >= listed[1].created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn equal_created_at_is_ordered_by_id_descending(pool: PgPool) {
    let (store, user_id) = store_with_user(pool.clone()).await;
    let created_at = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

    let mut ids = vec![new_id(), new_id(), new_id()];
    for id in &ids {
        sqlx::query(
            "INSERT INTO progress_entries (id, user_id, metric_name, value, created_at) \
             VALUES ($1, $2, 'streak_days', 1, $3)",
        )
        .bind(id)
        .bind(user_id)
        .bind(created_at)
        .execute(&pool)
        .await
        .unwrap();
    }

    let listed = ProgressStore::list(&store, user_id, &ProgressQuery::default())
        .await
        .unwrap();
    ids.sort_unstable_by(|a, b| b.cmp(a));
    let listed_ids: Vec<EntityId> = listed.iter().map(|e| e.id).collect();
    assert_eq!(listed_ids, ids);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn metric_filter_excludes_other_metrics(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;
    ProgressStore::create(&store, user_id, &entry("streak_days", 3.0, Some(3)))
        .await
        .unwrap();
    ProgressStore::create(&store, user_id, &entry("adherence_pct", 87.5, None))
        .await
        .unwrap();

    let query = ProgressQuery {
        metric_name: Some("adherence_pct".into()),
        ..ProgressQuery::default()
    };
    let listed = ProgressStore::list(&store, user_id, &query).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].metric_name, "adherence_pct");
    assert_eq!(listed[0].int_value, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn user_without_entries_lists_empty(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;
    let listed = ProgressStore::list(&store, user_id, &ProgressQuery::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_for_unknown_user_maps_fk_violation(pool: PgPool) {
    let store = PgStore::new(pool);
    let err = ProgressStore::create(&store, new_id(), &entry("streak_days", 1.0, None))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "User", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_with_missing_metric_name_is_rejected(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;
    let input = CreateProgressEntry {
        metric_name: None,
        value: Some(1.0),
        int_value: None,
    };
    let err = ProgressStore::create(&store, user_id, &input).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Medications and doses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn medication_round_trips_with_schedule_arrays(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;

    let created = MedicationStore::create(
        &store,
        user_id,
        &CreateUserMedication::daily("Metformin", &["8:00 AM", "8:00 PM"]),
        monday(),
    )
    .await
    .unwrap();
    assert_eq!(created.schedules[0].time_of_day, vec!["8:00 AM", "8:00 PM"]);
    assert_eq!(created.schedules[0].start_date, monday());

    let listed = MedicationStore::list(&store, user_id).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let reminders = store.reminder_schedules(user_id).await.unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].medication_name, "Metformin");
    assert_eq!(reminders[0].days.len(), 5);

    assert!(MedicationStore::delete(&store, user_id, created.medication.id)
        .await
        .unwrap());
    assert!(MedicationStore::list(&store, user_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn medication_for_unknown_user_maps_fk_violation(pool: PgPool) {
    let store = PgStore::new(pool);
    let err = MedicationStore::create(
        &store,
        new_id(),
        &CreateUserMedication::daily("Metformin", &["8:00 AM"]),
        monday(),
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "User", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn dose_lifecycle(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;
    let created = MedicationStore::create(
        &store,
        user_id,
        &CreateUserMedication::daily("Lisinopril", &["9:00 AM"]),
        monday(),
    )
    .await
    .unwrap();
    let schedule_id = created.schedules[0].id;
    let slot = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();

    let dose = store.get_or_create(user_id, schedule_id, slot).await.unwrap();
    assert_eq!(dose.status, STATUS_PENDING);
    let same = store.get_or_create(user_id, schedule_id, slot).await.unwrap();
    assert_eq!(same.id, dose.id);

    let snoozed = store.snooze(user_id, dose.id).await.unwrap();
    assert_eq!(snoozed.status, STATUS_SNOOZED);
    assert_eq!(snoozed.scheduled_time, slot + chrono::Duration::minutes(15));

    let taken = store.mark_taken(user_id, dose.id, Utc::now()).await.unwrap();
    assert_eq!(taken.status, STATUS_TAKEN);
    assert!(taken.taken_at.is_some());

    let err = store.snooze(user_id, dose.id).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Conflict(_)));

    let err = store.snooze(user_id, new_id()).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "DoseLog", .. }));
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_maps_to_conflict(pool: PgPool) {
    let (store, _) = store_with_user(pool).await;
    let err = UserStore::create(&store, &CreateUser::with_email("pat@example.com"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn find_by_id_and_list_users(pool: PgPool) {
    let (store, user_id) = store_with_user(pool).await;

    let user = store.find_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(user.email, "pat@example.com");
    assert_eq!(user.auth_provider, "google");

    let users = UserStore::list(&store).await.unwrap();
    assert_eq!(users.len(), 1);

    assert!(store.find_by_id(new_id()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn health_check_succeeds(pool: PgPool) {
    dosemate_db::health_check(&pool).await.unwrap();
    let store = PgStore::new(pool);
    ProgressStore::health_check(&store).await.unwrap();
}
