use serde::{Deserialize, Serialize};

use crate::import::SocialPlatform;
use crate::models::{Entity, EntityId, Likeable, Saveable};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeAuthor {
    pub id: EntityId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_platform: Option<SocialPlatform>,
    #[serde(default)]
    pub author: Option<RecipeAuthor>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_saved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Recipe {
    /// Image to render: `imageUrl`, then `thumbnailUrl`, then `thumbnailPath`.
    pub fn display_image(&self) -> Option<&str> {
        [&self.image_url, &self.thumbnail_url, &self.thumbnail_path]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.trim().is_empty())
    }

    pub fn image_fields(&self) -> ImageFields {
        ImageFields {
            image_url: non_blank(self.image_url.clone()),
            thumbnail_url: non_blank(self.thumbnail_url.clone()),
            thumbnail_path: non_blank(self.thumbnail_path.clone()),
        }
    }
}

impl Entity for Recipe {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Likeable for Recipe {
    fn is_liked(&self) -> bool {
        self.is_liked
    }

    fn set_liked(&mut self, liked: bool) {
        self.is_liked = liked;
    }

    fn like_count(&self) -> u64 {
        self.like_count
    }

    fn set_like_count(&mut self, count: u64) {
        self.like_count = count;
    }
}

impl Saveable for Recipe {
    fn is_saved(&self) -> bool {
        self.is_saved
    }

    fn set_saved(&mut self, saved: bool) {
        self.is_saved = saved;
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ImageFields {
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_path: Option<String>,
}

/// What the edit form decided about the recipe image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ImageSelection {
    Keep,
    Url(String),
    Upload(String),
    Remove,
}

impl ImageSelection {
    pub fn resolve(&self, existing: Option<&Recipe>) -> ImageFields {
        match self {
            Self::Keep => existing.map(Recipe::image_fields).unwrap_or_default(),
            Self::Url(url) => match non_blank(Some(url.trim().to_string())) {
                Some(url) => ImageFields {
                    image_url: Some(url.clone()),
                    thumbnail_url: Some(url),
                    thumbnail_path: None,
                },
                None => ImageFields::default(),
            },
            Self::Upload(path) => ImageFields {
                image_url: None,
                thumbnail_url: None,
                thumbnail_path: non_blank(Some(path.clone())),
            },
            Self::Remove => ImageFields::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl RecipeDraft {
    /// Draft prefilled from an existing record, for the edit form.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            category_id: recipe.category_id,
            tags: recipe.tags.clone(),
            image_url: recipe.image_url.clone(),
            thumbnail_url: recipe.thumbnail_url.clone(),
            thumbnail_path: recipe.thumbnail_path.clone(),
            source_url: recipe.source_url.clone(),
        }
    }

    pub fn with_image(mut self, selection: &ImageSelection, existing: Option<&Recipe>) -> Self {
        let fields = selection.resolve(existing);
        self.image_url = fields.image_url;
        self.thumbnail_url = fields.thumbnail_url;
        self.thumbnail_path = fields.thumbnail_path;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
