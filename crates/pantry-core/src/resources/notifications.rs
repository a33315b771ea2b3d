use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::models::{CoreError, EntityId, ListQuery, Notification, ResourceKind, StoreAction};
use crate::resources::{NotificationBinding, NotificationStore};
use crate::store::{ListPage, ResourceBinding, StoreResult};
use crate::toast::ToastChannel;
use crate::transport::{ApiError, ApiRequest, ApiTransport};

const UNREAD_COUNT_PATH: &str = "/notifications/unread-count";

/// Notification store plus the unread badge count.
///
/// The unread count is a background read: refreshing it never flips the
/// store's loading flag, never sets its error and never raises a toast.
pub struct NotificationCenter {
    store: NotificationStore,
    transport: Arc<dyn ApiTransport>,
    unread: watch::Sender<u64>,
}

impl NotificationCenter {
    pub fn new(transport: Arc<dyn ApiTransport>, toasts: Arc<ToastChannel>) -> Self {
        let (unread, _) = watch::channel(0);
        Self {
            store: NotificationStore::new(transport.clone(), toasts),
            transport,
            unread,
        }
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn unread_count(&self) -> u64 {
        *self.unread.borrow()
    }

    pub fn subscribe_unread(&self) -> watch::Receiver<u64> {
        self.unread.subscribe()
    }

    pub async fn fetch_list(&self, query: ListQuery) -> StoreResult<ListPage<Notification>> {
        self.store.fetch_list(query).await
    }

    pub async fn refresh_unread_count(&self) -> StoreResult<u64> {
        let count = self
            .transport
            .send(ApiRequest::get(UNREAD_COUNT_PATH))
            .await
            .and_then(|body| parse_unread_count(&body))
            .map_err(|error| attribute(error, StoreAction::UnreadCount))?;

        self.unread.send_replace(count);
        Ok(count)
    }

    pub async fn mark_read(&self, id: EntityId) -> StoreResult<()> {
        let was_unread = self.store.mark_read(id).await?;
        if was_unread {
            self.unread
                .send_modify(|count| *count = count.saturating_sub(1));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self) -> StoreResult<()> {
        self.store.mark_all_read().await?;
        self.unread.send_replace(0);
        Ok(())
    }

    pub async fn remove(&self, id: EntityId) -> StoreResult<()> {
        let was_unread = self
            .store
            .snapshot()
            .find(id)
            .is_some_and(|notification| !notification.read);
        self.store.remove(id).await?;
        if was_unread {
            self.unread
                .send_modify(|count| *count = count.saturating_sub(1));
        }
        Ok(())
    }
}

fn parse_unread_count(body: &Value) -> Result<u64, ApiError> {
    ["count", "unreadCount"]
        .into_iter()
        .find_map(|key| body.get(key).and_then(Value::as_u64))
        .ok_or(ApiError::InvalidResponse)
}

fn attribute(error: ApiError, action: StoreAction) -> CoreError {
    let error = error.into_core(NotificationBinding::KIND, action);
    tracing::debug!(
        resource = ?ResourceKind::Notification,
        kind = ?error.kind,
        message = %error.message,
        "unread count refresh failed"
    );
    error
}
