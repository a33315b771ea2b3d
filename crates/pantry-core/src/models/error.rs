use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::models::{ResourceKind, StoreAction};

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CoreErrorKind {
    Network,
    InvalidResponse,
    Validation,
    Unauthorized,
    NotFound,
    Server,
    InvalidInput,
    StorageFailure,
    Internal,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoreError {
    pub resource: Option<ResourceKind>,
    pub action: Option<StoreAction>,
    pub kind: CoreErrorKind,
    pub message: String,
    pub details: Vec<FieldError>,
}

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            resource: None,
            action: None,
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn attributed(mut self, resource: ResourceKind, action: StoreAction) -> Self {
        self.resource = self.resource.or(Some(resource));
        self.action = self.action.or(Some(action));
        self
    }

    /// Text shown to the user: the message, followed by one `field: message`
    /// line per validation detail.
    pub fn user_message(&self) -> String {
        if self.details.is_empty() {
            return self.message.clone();
        }

        let mut lines = Vec::with_capacity(self.details.len() + 1);
        lines.push(self.message.clone());
        lines.extend(
            self.details
                .iter()
                .map(|detail| format!("{}: {}", detail.field, detail.message)),
        );
        lines.join("\n")
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CoreError {}
