pub mod collections;
pub mod notifications;
pub mod recipes;

pub use notifications::NotificationCenter;

use crate::models::{
    Category, CategoryDraft, Collection, CollectionDraft, Notification, Recipe, RecipeDraft,
    ResourceKind, Tag, TagDraft,
};
use crate::store::{DraftBinding, ResourceBinding, ResourceStore};

pub struct RecipeBinding;

impl ResourceBinding for RecipeBinding {
    type Entity = Recipe;

    const KIND: ResourceKind = ResourceKind::Recipe;
    const PATH: &'static str = "/recipes";
    const PLURAL: &'static str = "recipes";
    const SINGULAR: &'static str = "recipe";
    const SAVED_PATH: Option<&'static str> = Some("/recipes/saved");
}

impl DraftBinding for RecipeBinding {
    type Draft = RecipeDraft;
}

pub struct CollectionBinding;

impl ResourceBinding for CollectionBinding {
    type Entity = Collection;

    const KIND: ResourceKind = ResourceKind::Collection;
    const PATH: &'static str = "/collections";
    const PLURAL: &'static str = "collections";
    const SINGULAR: &'static str = "collection";
}

impl DraftBinding for CollectionBinding {
    type Draft = CollectionDraft;
}

pub struct NotificationBinding;

impl ResourceBinding for NotificationBinding {
    type Entity = Notification;

    const KIND: ResourceKind = ResourceKind::Notification;
    const PATH: &'static str = "/notifications";
    const PLURAL: &'static str = "notifications";
    const SINGULAR: &'static str = "notification";
}

pub struct CategoryBinding;

impl ResourceBinding for CategoryBinding {
    type Entity = Category;

    const KIND: ResourceKind = ResourceKind::Category;
    const PATH: &'static str = "/categories";
    const PLURAL: &'static str = "categories";
    const SINGULAR: &'static str = "category";
}

impl DraftBinding for CategoryBinding {
    type Draft = CategoryDraft;
}

pub struct TagBinding;

impl ResourceBinding for TagBinding {
    type Entity = Tag;

    const KIND: ResourceKind = ResourceKind::Tag;
    const PATH: &'static str = "/tags";
    const PLURAL: &'static str = "tags";
    const SINGULAR: &'static str = "tag";
}

impl DraftBinding for TagBinding {
    type Draft = TagDraft;
}

pub type RecipeStore = ResourceStore<RecipeBinding>;
pub type CollectionStore = ResourceStore<CollectionBinding>;
pub type NotificationStore = ResourceStore<NotificationBinding>;
pub type CategoryStore = ResourceStore<CategoryBinding>;
pub type TagStore = ResourceStore<TagBinding>;
