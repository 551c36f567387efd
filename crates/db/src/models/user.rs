//! User entity model and DTOs.

use dosemate_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub auth_provider: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    /// Defaults to `"google"` when absent.
    pub auth_provider: Option<String>,
}

impl CreateUser {
    /// Minimal input: just an email address.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            picture: None,
            auth_provider: None,
        }
    }
}
