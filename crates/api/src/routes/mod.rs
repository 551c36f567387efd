pub mod health;
pub mod medicines;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /medicines/all                                   catalog
/// /users                                           list, create
/// /users/{user_id}                                 get
/// /users/{user_id}/progress                        list, create
/// /users/{user_id}/medications                     list, create
/// /users/{user_id}/medications/{medication_id}     delete
/// /users/{user_id}/reminders/today                 list
/// /users/{user_id}/reminders/{dose_id}/mark-taken  action
/// /users/{user_id}/reminders/{dose_id}/snooze      action
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/medicines", medicines::router())
        .nest("/users", users::router())
}
