use std::sync::Mutex;

use crate::models::{CoreError, CoreErrorKind};
use crate::persistence::{PersistenceResult, SessionStore, StoredSession};

#[derive(Default)]
pub struct InMemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Option<StoredSession>>> {
        self.session.lock().map_err(|_| {
            CoreError::new(
                CoreErrorKind::Internal,
                "in-memory session store mutex poisoned",
            )
        })
    }
}

impl SessionStore for InMemorySessionStore {
    fn load_session(&self) -> PersistenceResult<Option<StoredSession>> {
        Ok(self.lock()?.clone())
    }

    fn save_session(&self, session: &StoredSession) -> PersistenceResult<()> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> PersistenceResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}
