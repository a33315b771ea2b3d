use serde::{Deserialize, Serialize};

use crate::models::{Entity, EntityId};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub recipe_count: u64,
}

impl Entity for Category {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub recipe_count: u64,
}

impl Entity for Tag {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TagDraft {
    pub name: String,
}
