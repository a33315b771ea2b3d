use serde_json::json;

use crate::models::{Collection, EntityId, StoreAction};
use crate::resources::CollectionBinding;
use crate::store::envelope::decode_optional_field;
use crate::store::{ResourceBinding, ResourceStore, StoreResult, reconcile};
use crate::transport::ApiRequest;

impl ResourceStore<CollectionBinding> {
    pub async fn add_recipe(
        &self,
        collection_id: EntityId,
        recipe_id: EntityId,
    ) -> StoreResult<Option<Collection>> {
        let _loading = self.begin();
        let updated = self
            .run(
                StoreAction::AddToCollection,
                ApiRequest::post(format!(
                    "{}/recipes",
                    CollectionBinding::item_path(collection_id)
                ))
                .with_body(json!({ "recipeId": recipe_id })),
                |body| decode_optional_field::<Collection>(body, CollectionBinding::SINGULAR),
            )
            .await?;

        self.reconcile_membership(collection_id, recipe_id, updated.as_ref(), true);
        self.announce(StoreAction::AddToCollection);
        Ok(updated)
    }

    pub async fn remove_recipe(
        &self,
        collection_id: EntityId,
        recipe_id: EntityId,
    ) -> StoreResult<Option<Collection>> {
        let _loading = self.begin();
        let updated = self
            .run(
                StoreAction::RemoveFromCollection,
                ApiRequest::delete(format!(
                    "{}/recipes/{recipe_id}",
                    CollectionBinding::item_path(collection_id)
                )),
                |body| decode_optional_field::<Collection>(body, CollectionBinding::SINGULAR),
            )
            .await?;

        self.reconcile_membership(collection_id, recipe_id, updated.as_ref(), false);
        self.announce(StoreAction::RemoveFromCollection);
        Ok(updated)
    }

    /// Uses the returned collection when the server sends one. Otherwise the
    /// held copies are patched; a copy whose recipes are loaded only moves its
    /// count when membership actually changes.
    fn reconcile_membership(
        &self,
        collection_id: EntityId,
        recipe_id: EntityId,
        updated: Option<&Collection>,
        added: bool,
    ) {
        self.modify(|state| match updated {
            Some(collection) => {
                reconcile::replace_everywhere(state, collection);
            }
            None => {
                reconcile::patch_everywhere(state, collection_id, |collection| {
                    adjust_membership(collection, recipe_id, added);
                });
            }
        });
    }
}

fn adjust_membership(collection: &mut Collection, recipe_id: EntityId, added: bool) {
    if collection.recipes.is_empty() {
        // Recipes not loaded: trust the server and move the count.
        collection.recipe_count = if added {
            collection.recipe_count.saturating_add(1)
        } else {
            collection.recipe_count.saturating_sub(1)
        };
        return;
    }

    let held = collection.contains_recipe(recipe_id);
    if added && !held {
        collection.recipe_count = collection.recipe_count.saturating_add(1);
    } else if !added && held {
        collection.recipes.retain(|recipe| recipe.id != recipe_id);
        collection.recipe_count = collection.recipe_count.saturating_sub(1);
    }
}
