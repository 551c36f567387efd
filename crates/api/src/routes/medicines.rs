use axum::routing::get;
use axum::Router;

use crate::handlers::medicines;
use crate::state::AppState;

/// Routes mounted at `/medicines`.
pub fn router() -> Router<AppState> {
    Router::new().route("/all", get(medicines::list_all))
}
