mod support;

use pantry_core::models::{
    CollectionDraft, CoreErrorKind, EntityId, FieldError, ImageSelection, ListQuery, RecipeDraft,
};
use pantry_core::resources::{CollectionStore, RecipeStore};
use pantry_core::toast::ToastKind;
use pantry_core::transport::{ApiError, Method};
use serde_json::json;

use support::{ScriptedTransport, recipe_json, recipe_list, server_error, toasts};

async fn loaded_recipes(transport: &std::sync::Arc<ScriptedTransport>) -> RecipeStore {
    transport.respond(
        Method::Get,
        "/recipes",
        recipe_list(vec![recipe_json(1, false, 3), recipe_json(2, true, 7)], 2),
    );
    let store = RecipeStore::new(transport.clone(), toasts());
    store.fetch_list(ListQuery::default()).await.unwrap();
    store
}

fn like_state(store: &RecipeStore) -> Vec<(i64, bool, u64)> {
    store
        .items()
        .iter()
        .map(|recipe| (recipe.id.0, recipe.is_liked, recipe.like_count))
        .collect()
}

#[tokio::test]
async fn liking_one_recipe_patches_only_that_recipe() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    transport.respond(Method::Post, "/recipes/1/like", json!({"success": true}));

    let liked = store.toggle_like(EntityId(1)).await.unwrap();

    assert!(liked);
    assert_eq!(like_state(&store), vec![(1, true, 4), (2, true, 7)]);
    let last = transport.requests().pop().unwrap();
    assert_eq!(last.method, Method::Post);
    assert_eq!(last.path, "/recipes/1/like");
}

#[tokio::test]
async fn like_then_unlike_restores_the_record() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    let before = store.items();
    transport.respond(Method::Post, "/recipes/1/like", json!({"success": true}));
    transport.respond(Method::Delete, "/recipes/1/like", json!({"success": true}));

    assert!(store.toggle_like(EntityId(1)).await.unwrap());
    assert!(!store.toggle_like(EntityId(1)).await.unwrap());

    assert_eq!(store.items(), before);
}

#[tokio::test]
async fn like_patches_every_copy_held_by_the_store() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    transport.respond(
        Method::Get,
        "/recipes/1",
        json!({"success": true, "recipe": recipe_json(1, false, 3)}),
    );
    transport.respond(Method::Post, "/recipes/1/like", json!({"success": true}));

    store.fetch_one(EntityId(1)).await.unwrap();
    store.toggle_like(EntityId(1)).await.unwrap();

    let current = store.current().unwrap();
    assert!(current.is_liked);
    assert_eq!(current.like_count, 4);
    assert_eq!(like_state(&store)[0], (1, true, 4));
}

#[tokio::test]
async fn mutation_in_one_store_leaves_other_stores_untouched() {
    let transport = ScriptedTransport::new();
    let recipes = loaded_recipes(&transport).await;
    transport.respond(
        Method::Get,
        "/collections",
        json!({
            "success": true,
            "collections": [{
                "id": 5,
                "name": "Weeknight",
                "recipeCount": 1,
                "recipes": [recipe_json(1, false, 3)]
            }]
        }),
    );
    let collections = CollectionStore::new(transport.clone(), toasts());
    collections.fetch_list(ListQuery::default()).await.unwrap();
    let other_before = collections.snapshot();
    transport.respond(Method::Post, "/recipes/1/like", json!({"success": true}));

    recipes.toggle_like(EntityId(1)).await.unwrap();

    let other_after = collections.snapshot();
    assert_eq!(other_after.items, other_before.items);
    assert!(!other_after.items[0].recipes[0].is_liked);
}

#[tokio::test]
async fn failed_like_leaves_the_list_unchanged() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    let before = store.items();
    transport.fail(Method::Post, "/recipes/1/like", server_error("Like failed"));

    let error = store.toggle_like(EntityId(1)).await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::Server);
    assert_eq!(store.items(), before);
    assert_eq!(store.error().as_deref(), Some("Like failed"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn toggling_a_record_that_is_not_loaded_sends_nothing() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    let sent = transport.request_count();

    let error = store.toggle_like(EntityId(42)).await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::InvalidInput);
    assert_eq!(transport.request_count(), sent);
}

#[tokio::test]
async fn unsaving_removes_the_record_from_the_saved_list() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/recipes/saved",
        json!({
            "success": true,
            "recipes": [
                {"id": 1, "title": "Soup", "isSaved": true},
                {"id": 2, "title": "Stew", "isSaved": true}
            ],
            "pagination": {"total": 2, "page": 1, "limit": 12}
        }),
    );
    transport.respond(Method::Delete, "/recipes/1/save", json!({"success": true}));
    let store = RecipeStore::new(transport.clone(), toasts());
    store.fetch_saved(ListQuery::default()).await.unwrap();

    let saved = store.toggle_save(EntityId(1)).await.unwrap();

    let state = store.snapshot();
    assert!(!saved);
    assert_eq!(
        state.saved.iter().map(|recipe| recipe.id).collect::<Vec<_>>(),
        vec![EntityId(2)]
    );
    assert_eq!(state.saved_pagination.unwrap().total, 1);
}

#[tokio::test]
async fn saving_flags_the_listed_record() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    transport.respond(Method::Post, "/recipes/2/save", json!({"success": true}));

    assert!(store.toggle_save(EntityId(2)).await.unwrap());

    let items = store.items();
    assert!(!items[0].is_saved);
    assert!(items[1].is_saved);
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/recipes",
        recipe_list(
            vec![
                recipe_json(1, false, 0),
                recipe_json(2, false, 0),
                recipe_json(3, false, 0),
            ],
            3,
        ),
    );
    transport.respond(Method::Delete, "/recipes/2", json!({"success": true}));
    let toast_channel = toasts();
    let store = RecipeStore::new(transport.clone(), toast_channel.clone());
    store.fetch_list(ListQuery::default()).await.unwrap();

    store.remove(EntityId(2)).await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.item_ids(), vec![EntityId(1), EntityId(3)]);
    assert_eq!(state.pagination.unwrap().total, 2);
    let active = toast_channel.active();
    assert_eq!(active[0].kind, ToastKind::Success);
    assert_eq!(active[0].message, "Recipe deleted");
}

#[tokio::test]
async fn create_returns_the_record_without_inserting_it() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    transport.respond(
        Method::Post,
        "/recipes",
        json!({"success": true, "recipe": recipe_json(3, false, 0)}),
    );
    let draft = RecipeDraft {
        title: "Recipe 3".to_string(),
        ..RecipeDraft::default()
    }
    .with_image(&ImageSelection::Url("https://img.example/3.jpg".to_string()), None);

    let created = store.create(&draft).await.unwrap();

    assert_eq!(created.id, EntityId(3));
    assert_eq!(store.snapshot().item_ids(), vec![EntityId(1), EntityId(2)]);
    assert_eq!(store.current(), None);

    let body = transport.requests().pop().unwrap().body.unwrap();
    assert_eq!(body["title"], "Recipe 3");
    assert_eq!(body["imageUrl"], "https://img.example/3.jpg");
    assert_eq!(body["thumbnailUrl"], "https://img.example/3.jpg");
    assert!(body["thumbnailPath"].is_null());
}

#[tokio::test]
async fn validation_failure_lists_field_details() {
    let transport = ScriptedTransport::new();
    transport.fail(
        Method::Post,
        "/collections",
        ApiError::Validation {
            message: "Validation failed".to_string(),
            details: vec![FieldError {
                field: "name".to_string(),
                message: "Name is required".to_string(),
            }],
        },
    );
    let toast_channel = toasts();
    let store = CollectionStore::new(transport.clone(), toast_channel.clone());

    let error = store.create(&CollectionDraft::default()).await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::Validation);
    assert_eq!(error.details.len(), 1);
    assert_eq!(
        store.error().as_deref(),
        Some("Validation failed\nname: Name is required")
    );
    assert_eq!(toast_channel.active()[0].kind, ToastKind::Error);
}

#[tokio::test]
async fn update_replaces_the_record_in_place() {
    let transport = ScriptedTransport::new();
    let store = loaded_recipes(&transport).await;
    let mut updated = recipe_json(2, true, 7);
    updated["title"] = json!("Better stew");
    transport.respond(
        Method::Put,
        "/recipes/2",
        json!({"success": true, "recipe": updated}),
    );
    let existing = store.items()[1].clone();

    store
        .update(EntityId(2), &RecipeDraft::from_recipe(&existing))
        .await
        .unwrap();

    let titles: Vec<String> = store.items().into_iter().map(|recipe| recipe.title).collect();
    assert_eq!(titles, vec!["Recipe 1".to_string(), "Better stew".to_string()]);
}

#[tokio::test]
async fn adding_to_a_collection_uses_the_returned_collection() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/collections",
        json!({"success": true, "collections": [
            {"id": 5, "name": "Weeknight", "recipeCount": 0},
            {"id": 6, "name": "Brunch", "recipeCount": 2}
        ]}),
    );
    transport.respond(
        Method::Post,
        "/collections/5/recipes",
        json!({"success": true, "collection": {
            "id": 5,
            "name": "Weeknight",
            "recipeCount": 1,
            "recipes": [recipe_json(1, false, 0)]
        }}),
    );
    transport.respond(
        Method::Delete,
        "/collections/6/recipes/4",
        json!({"success": true}),
    );
    let store = CollectionStore::new(transport.clone(), toasts());
    store.fetch_list(ListQuery::default()).await.unwrap();

    store.add_recipe(EntityId(5), EntityId(1)).await.unwrap();
    store.remove_recipe(EntityId(6), EntityId(4)).await.unwrap();

    let items = store.items();
    assert!(items[0].contains_recipe(EntityId(1)));
    assert_eq!(items[0].recipe_count, 1);
    assert_eq!(items[1].recipe_count, 1);
    let add = &transport.requests()[1];
    assert_eq!(add.body, Some(json!({"recipeId": 1})));
}

#[tokio::test]
async fn membership_without_a_returned_collection_follows_held_recipes() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/collections",
        json!({"success": true, "collections": [{
            "id": 5,
            "name": "Weeknight",
            "recipeCount": 1,
            "recipes": [recipe_json(1, false, 0)]
        }]}),
    );
    transport.respond(Method::Post, "/collections/5/recipes", json!({"success": true}));
    transport.respond(Method::Delete, "/collections/5/recipes/99", json!({"success": true}));
    transport.respond(Method::Delete, "/collections/5/recipes/1", json!({"success": true}));
    let store = CollectionStore::new(transport.clone(), toasts());
    store.fetch_list(ListQuery::default()).await.unwrap();

    store.add_recipe(EntityId(5), EntityId(1)).await.unwrap();
    assert_eq!(store.items()[0].recipe_count, 1);
    assert_eq!(store.items()[0].recipes.len(), 1);

    store.remove_recipe(EntityId(5), EntityId(99)).await.unwrap();
    assert_eq!(store.items()[0].recipe_count, 1);

    store.remove_recipe(EntityId(5), EntityId(1)).await.unwrap();
    let collection = &store.items()[0];
    assert_eq!(collection.recipe_count, 0);
    assert!(collection.recipes.is_empty());
}

#[tokio::test]
async fn import_rejects_bad_urls_before_sending() {
    let transport = ScriptedTransport::new();
    let store = RecipeStore::new(transport.clone(), toasts());

    let error = store.import_from_social("not a url").await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::InvalidInput);
    assert_eq!(transport.request_count(), 0);
    assert!(store.error().is_some());
}

#[tokio::test]
async fn import_posts_the_detected_platform() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Post,
        "/recipes/import",
        json!({"success": true, "recipe": recipe_json(11, false, 0)}),
    );
    let toast_channel = toasts();
    let store = RecipeStore::new(transport.clone(), toast_channel.clone());

    let recipe = store
        .import_from_social("https://www.instagram.com/p/abc123/")
        .await
        .unwrap();

    assert_eq!(recipe.id, EntityId(11));
    assert!(store.items().is_empty());
    assert_eq!(
        transport.requests()[0].body,
        Some(json!({
            "url": "https://www.instagram.com/p/abc123/",
            "platform": "instagram"
        }))
    );
    assert_eq!(toast_channel.active()[0].message, "Recipe imported");
}
