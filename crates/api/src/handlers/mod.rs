pub mod medications;
pub mod medicines;
pub mod progress;
pub mod reminders;
pub mod users;
