//! Entity models and DTOs.

pub mod dose;
pub mod medication;
pub mod progress;
pub mod user;
