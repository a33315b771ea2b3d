use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::models::CoreResult;
use crate::persistence::{InMemorySessionStore, SessionStore};
use crate::poller::UnreadCountPoller;
use crate::resources::{CategoryStore, CollectionStore, NotificationCenter, RecipeStore, TagStore};
use crate::sqlite::SqliteStore;
use crate::toast::ToastChannel;
use crate::transport::{ApiTransport, SessionToken, UreqTransport};

/// One store per resource, sharing a transport, a toast channel and the
/// session token.
pub struct PantryClient {
    pub recipes: RecipeStore,
    pub collections: CollectionStore,
    pub notifications: Arc<NotificationCenter>,
    pub categories: CategoryStore,
    pub tags: TagStore,
    pub auth: AuthClient,
    toasts: Arc<ToastChannel>,
    poll_interval: Duration,
}

impl PantryClient {
    pub fn from_config(config: &ClientConfig) -> CoreResult<Self> {
        let token = SessionToken::new();
        let transport: Arc<dyn ApiTransport> = Arc::new(UreqTransport::new(
            config.base_url.clone(),
            config.request_timeout,
            token.clone(),
        ));

        let session_store: Arc<dyn SessionStore> = match &config.database_path {
            Some(path) => {
                let store = SqliteStore::new(path);
                store.migrate_to_latest()?;
                Arc::new(store)
            }
            None => Arc::new(InMemorySessionStore::new()),
        };

        let toasts = Arc::new(ToastChannel::new(
            config.toast_duration,
            config.toast_capacity,
        ));

        Ok(Self::assemble(
            transport,
            session_store,
            token,
            toasts,
            config.unread_poll_interval,
        ))
    }

    /// Wires the stores over a caller-supplied transport. The token is the
    /// one the transport reads its bearer header from.
    pub fn with_transport(
        transport: Arc<dyn ApiTransport>,
        session_store: Arc<dyn SessionStore>,
        token: SessionToken,
        toasts: Arc<ToastChannel>,
    ) -> Self {
        Self::assemble(
            transport,
            session_store,
            token,
            toasts,
            ClientConfig::default().unread_poll_interval,
        )
    }

    fn assemble(
        transport: Arc<dyn ApiTransport>,
        session_store: Arc<dyn SessionStore>,
        token: SessionToken,
        toasts: Arc<ToastChannel>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            recipes: RecipeStore::new(transport.clone(), toasts.clone()),
            collections: CollectionStore::new(transport.clone(), toasts.clone()),
            notifications: Arc::new(NotificationCenter::new(
                transport.clone(),
                toasts.clone(),
            )),
            categories: CategoryStore::new(transport.clone(), toasts.clone()),
            tags: TagStore::new(transport.clone(), toasts.clone()),
            auth: AuthClient::new(transport, session_store, token, toasts.clone()),
            toasts,
            poll_interval,
        }
    }

    pub fn toasts(&self) -> &Arc<ToastChannel> {
        &self.toasts
    }

    pub fn token(&self) -> &SessionToken {
        self.auth.token()
    }

    /// A stopped poller for the unread badge at the configured interval.
    pub fn unread_poller(&self) -> UnreadCountPoller {
        UnreadCountPoller::new(self.notifications.clone(), self.poll_interval)
    }
}
