//! Domain types, error taxonomy, and pure validation logic for the DoseMate
//! backend. Nothing in this crate performs I/O.

pub mod doses;
pub mod error;
pub mod medicines;
pub mod progress;
pub mod schedules;
pub mod types;
pub mod users;
