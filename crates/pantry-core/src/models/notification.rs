use serde::{Deserialize, Serialize};

use crate::models::{Entity, EntityId, Readable};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationActor {
    pub id: EntityId,
    pub username: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    /// Server-side notification type, e.g. `like`, `comment`, `follow`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "isRead")]
    pub read: bool,
    #[serde(default)]
    pub actor: Option<NotificationActor>,
    #[serde(default)]
    pub recipe_id: Option<EntityId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for Notification {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Readable for Notification {
    fn is_read(&self) -> bool {
        self.read
    }

    fn set_read(&mut self, read: bool) {
        self.read = read;
    }
}
