//! Route definitions for users and the resources nested under them.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{medications, progress, reminders, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                                          list
/// POST   /                                          create
/// GET    /{user_id}                                 get_by_id
/// GET    /{user_id}/progress                        progress::list
/// POST   /{user_id}/progress                        progress::create
/// GET    /{user_id}/medications                     medications::list
/// POST   /{user_id}/medications                     medications::create
/// DELETE /{user_id}/medications/{medication_id}     medications::delete
/// GET    /{user_id}/reminders/today                 reminders::today
/// POST   /{user_id}/reminders/{dose_id}/mark-taken  reminders::mark_taken
/// POST   /{user_id}/reminders/{dose_id}/snooze      reminders::snooze
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{user_id}", get(users::get_by_id))
        .route(
            "/{user_id}/progress",
            get(progress::list).post(progress::create),
        )
        .route(
            "/{user_id}/medications",
            get(medications::list).post(medications::create),
        )
        .route(
            "/{user_id}/medications/{medication_id}",
            delete(medications::delete),
        )
        .route("/{user_id}/reminders/today", get(reminders::today))
        .route(
            "/{user_id}/reminders/{dose_id}/mark-taken",
            post(reminders::mark_taken),
        )
        .route(
            "/{user_id}/reminders/{dose_id}/snooze",
            post(reminders::snooze),
        )
}
