use std::fmt::{Display, Formatter};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

pub trait Entity: Clone + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> EntityId;
}

/// Per-viewer like state plus the counter that moves with it.
pub trait Likeable: Entity {
    fn is_liked(&self) -> bool;

    fn set_liked(&mut self, liked: bool);

    fn like_count(&self) -> u64;

    fn set_like_count(&mut self, count: u64);
}

pub trait Saveable: Entity {
    fn is_saved(&self) -> bool;

    fn set_saved(&mut self, saved: bool);
}

pub trait Readable: Entity {
    fn is_read(&self) -> bool;

    fn set_read(&mut self, read: bool);
}
