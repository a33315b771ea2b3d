pub mod in_memory;

pub use in_memory::InMemorySessionStore;

use std::time::SystemTime;

use crate::models::CoreError;

pub type PersistenceResult<T> = Result<T, CoreError>;

/// What the client keeps between runs: the bearer token and the user JSON
/// it was issued for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user_json: String,
    pub saved_at: SystemTime,
}

pub trait MigrationStore: Send + Sync {
    fn current_version(&self) -> PersistenceResult<i64>;

    fn apply_migration(&self, target_version: i64) -> PersistenceResult<()>;
}

pub trait SessionStore: Send + Sync {
    fn load_session(&self) -> PersistenceResult<Option<StoredSession>>;

    fn save_session(&self, session: &StoredSession) -> PersistenceResult<()>;

    fn clear_session(&self) -> PersistenceResult<()>;
}
