//! Handler for the medicine reference catalog.

use axum::Json;
use dosemate_core::medicines::{Medicine, MEDICINE_CATALOG};

/// GET /medicines/all
pub async fn list_all() -> Json<&'static [Medicine]> {
    Json(MEDICINE_CATALOG)
}
