pub mod binding;
pub mod envelope;
pub mod reconcile;
pub mod state;

pub use binding::{DraftBinding, ResourceBinding};
pub use envelope::ListPage;
pub use state::{StorePhase, StoreState};

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::models::{
    CoreError, CoreErrorKind, EntityId, Likeable, ListQuery, Readable, ResourceKind, Saveable,
    StoreAction,
};
use crate::store::envelope::{decode_field, decode_list};
use crate::toast::{ToastChannel, ToastKind};
use crate::transport::{ApiError, ApiRequest, ApiTransport};

pub type StoreResult<T> = Result<T, CoreError>;

/// Cache-and-mutate store for one entity type.
///
/// Every action marks the store loading for exactly as long as it is
/// unresolved, clears the previous error when it starts, and on failure
/// records the message in `error` and raises an error toast before handing
/// the `CoreError` back. Failed actions never touch the held lists.
pub struct ResourceStore<B: ResourceBinding> {
    transport: Arc<dyn ApiTransport>,
    toasts: Arc<ToastChannel>,
    state: watch::Sender<StoreState<B::Entity>>,
    list_sequence: AtomicU64,
    saved_sequence: AtomicU64,
    _binding: PhantomData<fn() -> B>,
}

impl<B: ResourceBinding> ResourceStore<B> {
    pub fn new(transport: Arc<dyn ApiTransport>, toasts: Arc<ToastChannel>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            transport,
            toasts,
            state,
            list_sequence: AtomicU64::new(0),
            saved_sequence: AtomicU64::new(0),
            _binding: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        B::KIND
    }

    pub fn snapshot(&self) -> StoreState<B::Entity> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<B::Entity>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn items(&self) -> Vec<B::Entity> {
        self.state.borrow().items.clone()
    }

    pub fn item_ids(&self) -> Vec<EntityId> {
        self.state.borrow().item_ids()
    }

    pub fn current(&self) -> Option<B::Entity> {
        self.state.borrow().current.clone()
    }

    pub fn current_query(&self) -> Option<ListQuery> {
        self.state.borrow().query.clone()
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    pub async fn fetch_list(&self, query: ListQuery) -> StoreResult<ListPage<B::Entity>> {
        let ticket = next_ticket(&self.list_sequence);
        let _loading = self.begin();

        let request = ApiRequest::get(B::PATH).with_query(query.to_pairs());
        let outcome = self
            .exchange(StoreAction::FetchList, request, |body| {
                decode_list::<B::Entity>(body, B::PLURAL)
            })
            .await;

        if !is_latest(&self.list_sequence, ticket) {
            tracing::debug!(
                resource = ?B::KIND,
                ticket,
                "discarding superseded list response"
            );
            return outcome;
        }

        let page = outcome.map_err(|error| self.surface(error))?;
        let page = ListPage {
            items: reconcile::dedupe_by_id(page.items),
            pagination: page.pagination,
        };
        self.state.send_modify(|state| {
            state.items = page.items.clone();
            state.pagination = page.pagination;
            state.query = Some(query);
        });

        Ok(page)
    }

    /// Refetches the list for the stored query, or the first page if none.
    pub async fn refresh(&self) -> StoreResult<ListPage<B::Entity>> {
        let query = self.current_query().unwrap_or_default();
        self.fetch_list(query).await
    }

    pub async fn fetch_saved(&self, query: ListQuery) -> StoreResult<ListPage<B::Entity>> {
        let Some(saved_path) = B::SAVED_PATH else {
            return Err(self.surface(
                CoreError::new(
                    CoreErrorKind::InvalidInput,
                    format!("{} has no saved list", B::KIND),
                )
                .attributed(B::KIND, StoreAction::FetchSaved),
            ));
        };

        let ticket = next_ticket(&self.saved_sequence);
        let _loading = self.begin();

        let request = ApiRequest::get(saved_path).with_query(query.to_pairs());
        let outcome = self
            .exchange(StoreAction::FetchSaved, request, |body| {
                decode_list::<B::Entity>(body, B::PLURAL)
            })
            .await;

        if !is_latest(&self.saved_sequence, ticket) {
            tracing::debug!(
                resource = ?B::KIND,
                ticket,
                "discarding superseded saved-list response"
            );
            return outcome;
        }

        let page = outcome.map_err(|error| self.surface(error))?;
        let page = ListPage {
            items: reconcile::dedupe_by_id(page.items),
            pagination: page.pagination,
        };
        self.state.send_modify(|state| {
            state.saved = page.items.clone();
            state.saved_pagination = page.pagination;
        });

        Ok(page)
    }

    pub async fn fetch_one(&self, id: EntityId) -> StoreResult<B::Entity> {
        let _loading = self.begin();
        let entity = self
            .run(StoreAction::FetchOne, ApiRequest::get(B::item_path(id)), |body| {
                decode_field::<B::Entity>(body, B::SINGULAR)
            })
            .await?;

        self.state
            .send_modify(|state| state.current = Some(entity.clone()));
        Ok(entity)
    }

    pub async fn remove(&self, id: EntityId) -> StoreResult<()> {
        let _loading = self.begin();
        self.run(StoreAction::Remove, ApiRequest::delete(B::item_path(id)), |_| {
            Ok(())
        })
        .await?;

        self.state.send_modify(|state| {
            reconcile::remove_everywhere(state, id);
        });
        self.announce(StoreAction::Remove);
        Ok(())
    }

    pub(crate) fn begin(&self) -> LoadingGuard<'_, B::Entity> {
        self.state.send_modify(|state| {
            state.in_flight += 1;
            state.error = None;
        });
        LoadingGuard { state: &self.state }
    }

    pub(crate) fn modify(&self, modify: impl FnOnce(&mut StoreState<B::Entity>)) {
        self.state.send_modify(modify);
    }

    /// Sends the request and decodes the body, surfacing any failure.
    pub(crate) async fn run<T>(
        &self,
        action: StoreAction,
        request: ApiRequest,
        decode: impl FnOnce(&Value) -> Result<T, ApiError>,
    ) -> StoreResult<T> {
        self.exchange(action, request, decode)
            .await
            .map_err(|error| self.surface(error))
    }

    async fn exchange<T>(
        &self,
        action: StoreAction,
        request: ApiRequest,
        decode: impl FnOnce(&Value) -> Result<T, ApiError>,
    ) -> StoreResult<T> {
        tracing::debug!(
            resource = ?B::KIND,
            action = ?action,
            method = request.method.as_str(),
            path = %request.path,
            "store request"
        );

        let body = self
            .transport
            .send(request)
            .await
            .map_err(|error| error.into_core(B::KIND, action))?;
        decode(&body).map_err(|error| error.into_core(B::KIND, action))
    }

    pub(crate) fn surface(&self, error: CoreError) -> CoreError {
        let message = error.user_message();
        tracing::warn!(
            resource = ?B::KIND,
            action = ?error.action,
            kind = ?error.kind,
            message = %error.message,
            "store action failed"
        );
        self.state
            .send_modify(|state| state.error = Some(message.clone()));
        self.toasts.show_toast(message, ToastKind::Error);
        error
    }

    pub(crate) fn announce(&self, action: StoreAction) {
        if let Some(message) = action.success_message(B::KIND) {
            self.toasts.show_toast(message, ToastKind::Success);
        }
    }

    pub(crate) fn encode(&self, action: StoreAction, payload: &impl Serialize) -> StoreResult<Value> {
        serde_json::to_value(payload).map_err(|error| {
            self.surface(
                CoreError::new(
                    CoreErrorKind::InvalidInput,
                    format!("failed to encode {} payload: {error}", B::KIND),
                )
                .attributed(B::KIND, action),
            )
        })
    }

    fn held_flag(
        &self,
        id: EntityId,
        action: StoreAction,
        flag: impl FnOnce(&B::Entity) -> bool,
    ) -> StoreResult<bool> {
        let held = self.state.borrow().find(id).map(flag);
        held.ok_or_else(|| {
            self.surface(
                CoreError::new(
                    CoreErrorKind::InvalidInput,
                    format!("{} '{id}' is not loaded", B::KIND),
                )
                .attributed(B::KIND, action),
            )
        })
    }
}

impl<B: DraftBinding> ResourceStore<B> {
    /// Creates a record. The new record is returned but not inserted into
    /// any held list; callers refetch or navigate to it.
    pub async fn create(&self, draft: &B::Draft) -> StoreResult<B::Entity> {
        let _loading = self.begin();
        let body = self.encode(StoreAction::Create, draft)?;
        let entity = self
            .run(
                StoreAction::Create,
                ApiRequest::post(B::PATH).with_body(body),
                |body| decode_field::<B::Entity>(body, B::SINGULAR),
            )
            .await?;

        self.announce(StoreAction::Create);
        Ok(entity)
    }

    pub async fn update(&self, id: EntityId, draft: &B::Draft) -> StoreResult<B::Entity> {
        let _loading = self.begin();
        let body = self.encode(StoreAction::Update, draft)?;
        let entity = self
            .run(
                StoreAction::Update,
                ApiRequest::put(B::item_path(id)).with_body(body),
                |body| decode_field::<B::Entity>(body, B::SINGULAR),
            )
            .await?;

        self.state.send_modify(|state| {
            reconcile::replace_everywhere(state, &entity);
        });
        self.announce(StoreAction::Update);
        Ok(entity)
    }
}

impl<B: ResourceBinding> ResourceStore<B>
where
    B::Entity: Likeable,
{
    /// Likes or unlikes based on the held copy's flag; returns the new flag.
    pub async fn toggle_like(&self, id: EntityId) -> StoreResult<bool> {
        let liked = self.held_flag(id, StoreAction::Like, Likeable::is_liked)?;
        let path = format!("{}/like", B::item_path(id));
        let (action, request) = if liked {
            (StoreAction::Unlike, ApiRequest::delete(path))
        } else {
            (StoreAction::Like, ApiRequest::post(path))
        };

        let _loading = self.begin();
        self.run(action, request, |_| Ok(())).await?;

        let liked = !liked;
        self.state.send_modify(|state| {
            reconcile::patch_everywhere(state, id, |entity| reconcile::apply_like(entity, liked));
        });
        Ok(liked)
    }
}

impl<B: ResourceBinding> ResourceStore<B>
where
    B::Entity: Saveable,
{
    /// Saves or unsaves based on the held copy's flag; returns the new flag.
    /// An unsaved record also leaves the saved list.
    pub async fn toggle_save(&self, id: EntityId) -> StoreResult<bool> {
        let saved = self.held_flag(id, StoreAction::Save, Saveable::is_saved)?;
        let path = format!("{}/save", B::item_path(id));
        let (action, request) = if saved {
            (StoreAction::Unsave, ApiRequest::delete(path))
        } else {
            (StoreAction::Save, ApiRequest::post(path))
        };

        let _loading = self.begin();
        self.run(action, request, |_| Ok(())).await?;

        let saved = !saved;
        self.state.send_modify(|state| {
            reconcile::patch_everywhere(state, id, |entity| reconcile::apply_saved(entity, saved));
            if !saved {
                reconcile::remove_from_saved(state, id);
            }
        });
        Ok(saved)
    }
}

impl<B: ResourceBinding> ResourceStore<B>
where
    B::Entity: Readable,
{
    /// Marks one record read. Returns whether a held copy was unread.
    pub async fn mark_read(&self, id: EntityId) -> StoreResult<bool> {
        let was_unread = self
            .state
            .borrow()
            .find(id)
            .is_some_and(|entity| !entity.is_read());

        let _loading = self.begin();
        self.run(
            StoreAction::MarkRead,
            ApiRequest::put(format!("{}/read", B::item_path(id))),
            |_| Ok(()),
        )
        .await?;

        self.state.send_modify(|state| {
            reconcile::patch_everywhere(state, id, reconcile::apply_read);
        });
        Ok(was_unread)
    }

    pub async fn mark_all_read(&self) -> StoreResult<()> {
        let _loading = self.begin();
        self.run(
            StoreAction::MarkAllRead,
            ApiRequest::put(format!("{}/read-all", B::PATH)),
            |_| Ok(()),
        )
        .await?;

        self.state.send_modify(|state| {
            for entity in state
                .items
                .iter_mut()
                .chain(state.saved.iter_mut())
                .chain(state.current.iter_mut())
            {
                reconcile::apply_read(entity);
            }
        });
        Ok(())
    }
}

/// Holds one unit of the in-flight count; dropping it resolves the action
/// whether it succeeded, failed, or was cancelled mid-await.
pub(crate) struct LoadingGuard<'a, E> {
    state: &'a watch::Sender<StoreState<E>>,
}

impl<E> Drop for LoadingGuard<'_, E> {
    fn drop(&mut self) {
        self.state.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
        });
    }
}

fn next_ticket(sequence: &AtomicU64) -> u64 {
    sequence.fetch_add(1, Ordering::SeqCst) + 1
}

fn is_latest(sequence: &AtomicU64, ticket: u64) -> bool {
    sequence.load(Ordering::SeqCst) == ticket
}
