pub mod normalize;
pub mod ureq_transport;

pub use normalize::{GENERIC_FAILURE_MESSAGE, normalize_response};
pub use ureq_transport::UreqTransport;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;

use crate::models::{CoreError, CoreErrorKind, FieldError, ResourceKind, StoreAction};

pub type TransportResult<T> = Result<T, ApiError>;

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = TransportResult<Value>> + Send + 'a>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response. The detail is for logs only.
    #[error("an unexpected error occurred")]
    Network(String),

    #[error("invalid response from server")]
    InvalidResponse,

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::Network(_) => CoreErrorKind::Network,
            Self::InvalidResponse => CoreErrorKind::InvalidResponse,
            Self::Validation { .. } => CoreErrorKind::Validation,
            Self::Unauthorized { .. } => CoreErrorKind::Unauthorized,
            Self::NotFound { .. } => CoreErrorKind::NotFound,
            Self::Status { .. } => CoreErrorKind::Server,
        }
    }

    pub fn into_core(self, resource: ResourceKind, action: StoreAction) -> CoreError {
        let kind = self.kind();
        let message = self.to_string();
        let details = match self {
            Self::Validation { details, .. } => details,
            _ => Vec::new(),
        };
        CoreError {
            resource: Some(resource),
            action: Some(action),
            kind,
            message,
            details,
        }
    }
}

/// Carries the HTTP layer for every store. Expected failures (4xx/5xx,
/// unreadable bodies, network errors) come back as `ApiError`, never a panic.
pub trait ApiTransport: Send + Sync {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Bearer token shared between the auth client and the transport.
#[derive(Clone, Debug, Default)]
pub struct SessionToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        match self.inner.read() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, token: Option<String>) {
        let token = token.filter(|value| !value.trim().is_empty());
        match self.inner.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}
