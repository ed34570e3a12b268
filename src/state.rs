//! Application state shared by all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::session::PracticeSessions;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Learner database (profile and item lists)
    pub db: DbPool,

    /// Live vocabulary and sentence practice sessions
    pub sessions: Arc<PracticeSessions>,

    /// Key used to sign and verify backups
    pub backup_key: Arc<str>,
}

impl AppState {
    pub fn new(db: DbPool, backup_key: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            sessions: Arc::new(PracticeSessions::new()),
            backup_key: backup_key.into(),
        }
    }
}
