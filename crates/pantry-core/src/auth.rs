use std::sync::Arc;
use std::time::SystemTime;

use serde_json::{Value, json};

use crate::models::{AuthSession, CoreError, CoreErrorKind, ResourceKind, StoreAction, User};
use crate::persistence::{PersistenceResult, SessionStore, StoredSession};
use crate::store::envelope::decode_field;
use crate::toast::{ToastChannel, ToastKind};
use crate::transport::{ApiError, ApiRequest, ApiTransport, SessionToken};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const CURRENT_USER_PATH: &str = "/auth/me";

pub type AuthResult<T> = Result<T, CoreError>;

/// Owns the bearer token: issues it on login/register, persists it through
/// the session store, and drops it when the server rejects it.
pub struct AuthClient {
    transport: Arc<dyn ApiTransport>,
    session_store: Arc<dyn SessionStore>,
    token: SessionToken,
    toasts: Arc<ToastChannel>,
}

impl AuthClient {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        session_store: Arc<dyn SessionStore>,
        token: SessionToken,
        toasts: Arc<ToastChannel>,
    ) -> Self {
        Self {
            transport,
            session_store,
            token,
            toasts,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_present()
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let request = ApiRequest::post(LOGIN_PATH).with_body(json!({
            "email": email,
            "password": password,
        }));
        self.authenticate(StoreAction::Login, request).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<AuthSession> {
        let request = ApiRequest::post(REGISTER_PATH).with_body(json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        self.authenticate(StoreAction::Register, request).await
    }

    pub async fn logout(&self) -> AuthResult<()> {
        self.token.set(None);
        self.persist(StoreAction::Logout, |store| store.clear_session())
            .await
    }

    /// Reinstates a persisted session without contacting the server.
    pub async fn restore(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored) = self
            .persist(StoreAction::RestoreSession, |store| store.load_session())
            .await?
        else {
            return Ok(None);
        };

        let user = match serde_json::from_str::<User>(&stored.user_json) {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(
                    resource = ?ResourceKind::Session,
                    message = %error,
                    "discarding unreadable persisted session"
                );
                self.persist(StoreAction::RestoreSession, |store| {
                    store.clear_session()
                })
                .await?;
                return Ok(None);
            }
        };

        self.token.set(Some(stored.token.clone()));
        Ok(Some(AuthSession {
            token: stored.token,
            user,
        }))
    }

    /// Asks the server who the token belongs to. Never surfaces an error:
    /// a rejected token clears the session, anything else reads as `None`.
    pub async fn current_user(&self) -> Option<User> {
        if !self.token.is_present() {
            return None;
        }

        let outcome = self
            .transport
            .send(ApiRequest::get(CURRENT_USER_PATH))
            .await
            .and_then(|body| decode_field::<User>(&body, "user"));

        match outcome {
            Ok(user) => Some(user),
            Err(ApiError::Unauthorized { status, .. }) => {
                tracing::debug!(
                    resource = ?ResourceKind::Session,
                    status,
                    "session token rejected; clearing session"
                );
                if let Err(error) = self.logout().await {
                    tracing::warn!(
                        resource = ?ResourceKind::Session,
                        kind = ?error.kind,
                        message = %error.message,
                        "failed to clear rejected session"
                    );
                }
                None
            }
            Err(error) => {
                tracing::debug!(
                    resource = ?ResourceKind::Session,
                    message = %error,
                    "current user probe failed"
                );
                None
            }
        }
    }

    async fn authenticate(
        &self,
        action: StoreAction,
        request: ApiRequest,
    ) -> AuthResult<AuthSession> {
        let session = self
            .transport
            .send(request)
            .await
            .and_then(|body| decode_session(&body))
            .map_err(|error| self.surface(error.into_core(ResourceKind::Session, action)))?;

        let user_json = serde_json::to_string(&session.user).map_err(|error| {
            self.surface(
                CoreError::new(
                    CoreErrorKind::Internal,
                    format!("failed to encode session user: {error}"),
                )
                .attributed(ResourceKind::Session, action),
            )
        })?;
        let stored = StoredSession {
            token: session.token.clone(),
            user_json,
            saved_at: SystemTime::now(),
        };

        self.token.set(Some(session.token.clone()));
        self.persist(action, move |store| store.save_session(&stored))
            .await
            .map_err(|error| self.surface(error))?;
        Ok(session)
    }

    async fn persist<T: Send + 'static>(
        &self,
        action: StoreAction,
        operation: impl FnOnce(&dyn SessionStore) -> PersistenceResult<T> + Send + 'static,
    ) -> AuthResult<T> {
        let store = self.session_store.clone();
        tokio::task::spawn_blocking(move || operation(store.as_ref()))
            .await
            .map_err(|join_error| {
                CoreError::new(
                    CoreErrorKind::Internal,
                    format!("session persistence join failure: {join_error}"),
                )
                .attributed(ResourceKind::Session, action)
            })?
            .map_err(|error| error.attributed(ResourceKind::Session, action))
    }

    fn surface(&self, error: CoreError) -> CoreError {
        tracing::warn!(
            resource = ?ResourceKind::Session,
            action = ?error.action,
            kind = ?error.kind,
            message = %error.message,
            "auth action failed"
        );
        self.toasts.show_toast(error.user_message(), ToastKind::Error);
        error
    }
}

fn decode_session(body: &Value) -> Result<AuthSession, ApiError> {
    let token = decode_field::<String>(body, "token")?;
    if token.trim().is_empty() {
        return Err(ApiError::InvalidResponse);
    }
    let user = decode_field::<User>(body, "user")?;
    Ok(AuthSession { token, user })
}
