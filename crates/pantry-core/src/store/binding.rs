use serde::Serialize;

use crate::models::{Entity, ResourceKind};

/// Endpoint binding for one entity type. List endpoints answer
/// `{ success, <PLURAL>: [...], pagination? }`, single-entity endpoints
/// `{ success, <SINGULAR>: {...} }`.
pub trait ResourceBinding: Send + Sync + 'static {
    type Entity: Entity;

    const KIND: ResourceKind;
    const PATH: &'static str;
    const PLURAL: &'static str;
    const SINGULAR: &'static str;
    const SAVED_PATH: Option<&'static str> = None;

    fn item_path(id: impl std::fmt::Display) -> String {
        format!("{}/{id}", Self::PATH)
    }
}

/// Bindings whose entities can be created and updated from a payload.
pub trait DraftBinding: ResourceBinding {
    type Draft: Serialize + Send + Sync;
}
