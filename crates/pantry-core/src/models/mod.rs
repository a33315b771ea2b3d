pub mod collection;
pub mod entity;
pub mod error;
pub mod notification;
pub mod pagination;
pub mod query;
pub mod recipe;
pub mod resource;
pub mod taxonomy;
pub mod user;

pub use collection::{Collection, CollectionDraft};
pub use entity::{Entity, EntityId, Likeable, Readable, Saveable};
pub use error::{CoreError, CoreErrorKind, CoreResult, FieldError};
pub use notification::Notification;
pub use pagination::Pagination;
pub use query::ListQuery;
pub use recipe::{ImageFields, ImageSelection, Recipe, RecipeAuthor, RecipeDraft};
pub use resource::{ResourceKind, StoreAction};
pub use taxonomy::{Category, CategoryDraft, Tag, TagDraft};
pub use user::{AuthSession, User};
