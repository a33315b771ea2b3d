use serde::{Deserialize, Serialize};

use crate::models::{Entity, EntityId, Recipe};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub recipe_count: u64,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl Collection {
    pub fn contains_recipe(&self, recipe_id: EntityId) -> bool {
        self.recipes.iter().any(|recipe| recipe.id == recipe_id)
    }
}

impl Entity for Collection {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
}
