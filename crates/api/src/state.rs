use std::sync::Arc;

use dosemate_db::{
    DbPool, DoseStore, MedicationStore, MemoryStore, PgStore, ProgressStore, UserStore,
};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Every store field points at the same backing store; they are split by
/// trait so handlers only see the operations they need.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Progress entry persistence.
    pub progress: Arc<dyn ProgressStore>,
    /// User persistence.
    pub users: Arc<dyn UserStore>,
    /// Medications and their schedules.
    pub medications: Arc<dyn MedicationStore>,
    /// Per-slot dose logs.
    pub doses: Arc<dyn DoseStore>,
}

impl AppState {
    /// State backed by Postgres.
    pub fn postgres(config: ServerConfig, pool: DbPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            config: Arc::new(config),
            progress: store.clone(),
            users: store.clone(),
            medications: store.clone(),
            doses: store,
        }
    }

    /// State backed by the given in-memory store.
    pub fn in_memory(config: ServerConfig, store: Arc<MemoryStore>) -> Self {
        Self {
            config: Arc::new(config),
            progress: store.clone(),
            users: store.clone(),
            medications: store.clone(),
            doses: store,
        }
    }
}
