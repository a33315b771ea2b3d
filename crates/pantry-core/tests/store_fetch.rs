mod support;

use std::sync::Arc;
use std::time::Duration;

use pantry_core::models::{CoreErrorKind, EntityId, ListQuery};
use pantry_core::resources::{RecipeStore, TagStore};
use pantry_core::toast::ToastKind;
use pantry_core::transport::{ApiError, Method};
use serde_json::json;

use support::{ScriptedTransport, recipe_json, recipe_list, server_error, toasts};

#[tokio::test]
async fn fetching_the_same_query_twice_yields_the_same_list() {
    let transport = ScriptedTransport::new();
    for _ in 0..2 {
        transport.respond(
            Method::Get,
            "/recipes",
            recipe_list(vec![recipe_json(1, false, 3), recipe_json(2, true, 7)], 2),
        );
    }
    let store = RecipeStore::new(transport.clone(), toasts());

    store.fetch_list(ListQuery::page(1)).await.unwrap();
    let first = store.snapshot();
    store.fetch_list(ListQuery::page(1)).await.unwrap();
    let second = store.snapshot();

    assert_eq!(first.items, second.items);
    assert_eq!(first.pagination, second.pagination);
    assert_eq!(second.item_ids(), vec![EntityId(1), EntityId(2)]);
    assert_eq!(second.pagination.unwrap().pages, 1);
    assert_eq!(store.current_query(), Some(ListQuery::page(1)));
}

#[tokio::test]
async fn list_request_carries_page_limit_and_filters() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/recipes", recipe_list(vec![], 0));
    let store = RecipeStore::new(transport.clone(), toasts());

    store
        .fetch_list(ListQuery::page(2).search("soup").with_filter("category", ""))
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        request.query,
        vec![
            ("page".to_string(), "2".to_string()),
            ("limit".to_string(), "12".to_string()),
            ("search".to_string(), "soup".to_string()),
        ]
    );
}

#[tokio::test]
async fn failed_fetch_keeps_the_previous_list_and_surfaces_the_error() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/recipes",
        recipe_list(vec![recipe_json(1, false, 3)], 1),
    );
    transport.fail(Method::Get, "/recipes", server_error("Database unavailable"));
    let toast_channel = toasts();
    let store = RecipeStore::new(transport.clone(), toast_channel.clone());

    store.fetch_list(ListQuery::page(1)).await.unwrap();
    let error = store.fetch_list(ListQuery::page(2)).await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::Server);
    assert_eq!(store.item_ids(), vec![EntityId(1)]);
    assert_eq!(store.current_query(), Some(ListQuery::page(1)));
    assert_eq!(store.error().as_deref(), Some("Database unavailable"));
    assert!(!store.is_loading());

    let active = toast_channel.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, ToastKind::Error);
    assert_eq!(active[0].message, "Database unavailable");
}

#[tokio::test]
async fn next_action_clears_the_previous_error() {
    let transport = ScriptedTransport::new();
    transport.fail(Method::Get, "/tags", server_error("boom"));
    transport.respond(
        Method::Get,
        "/tags",
        json!({"success": true, "tags": [{"id": 1, "name": "vegan"}]}),
    );
    let store = TagStore::new(transport.clone(), toasts());

    assert!(store.fetch_list(ListQuery::default()).await.is_err());
    assert!(store.error().is_some());

    store.fetch_list(ListQuery::default()).await.unwrap();
    assert_eq!(store.error(), None);
    assert_eq!(store.items()[0].name, "vegan");
}

#[tokio::test]
async fn network_failures_show_the_generic_message() {
    let transport = ScriptedTransport::new();
    transport.fail(
        Method::Get,
        "/recipes",
        ApiError::Network("connection refused".to_string()),
    );
    let store = RecipeStore::new(transport.clone(), toasts());

    let error = store.fetch_list(ListQuery::default()).await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::Network);
    assert_eq!(store.error().as_deref(), Some("an unexpected error occurred"));
}

#[tokio::test]
async fn loading_flag_resolves_after_success_and_failure() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/recipes/4",
        json!({"success": true, "recipe": recipe_json(4, false, 0)}),
    );
    transport.fail(
        Method::Get,
        "/recipes/5",
        ApiError::NotFound {
            message: "Recipe not found".to_string(),
        },
    );
    let store = RecipeStore::new(transport.clone(), toasts());

    let recipe = store.fetch_one(EntityId(4)).await.unwrap();
    assert_eq!(store.current(), Some(recipe));
    assert!(!store.is_loading());

    let error = store.fetch_one(EntityId(5)).await.unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::NotFound);
    assert!(!store.is_loading());
    assert_eq!(store.current().map(|recipe| recipe.id), Some(EntityId(4)));
}

#[tokio::test(start_paused = true)]
async fn loading_flag_is_set_while_a_request_is_in_flight() {
    let transport = ScriptedTransport::new();
    transport.respond_after(
        Method::Get,
        "/recipes",
        Duration::from_millis(200),
        recipe_list(vec![recipe_json(1, false, 0)], 1),
    );
    let store = Arc::new(RecipeStore::new(transport.clone(), toasts()));

    let background = {
        let store = store.clone();
        tokio::spawn(async move { store.fetch_list(ListQuery::default()).await })
    };
    tokio::task::yield_now().await;
    assert!(store.is_loading());

    background.await.unwrap().unwrap();
    assert!(!store.is_loading());
}

#[tokio::test]
async fn cancelled_action_still_resolves_the_loading_flag() {
    let transport = ScriptedTransport::new();
    transport.respond_after(
        Method::Get,
        "/recipes",
        Duration::from_secs(60),
        recipe_list(vec![], 0),
    );
    let store = RecipeStore::new(transport.clone(), toasts());

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        store.fetch_list(ListQuery::default()),
    )
    .await;

    assert!(outcome.is_err());
    assert!(!store.is_loading());
}

#[tokio::test(start_paused = true)]
async fn superseded_list_response_is_discarded() {
    let transport = ScriptedTransport::new();
    transport.respond_after(
        Method::Get,
        "/recipes",
        Duration::from_millis(300),
        recipe_list(vec![recipe_json(1, false, 0)], 1),
    );
    transport.respond(
        Method::Get,
        "/recipes",
        recipe_list(vec![recipe_json(2, false, 0)], 1),
    );
    let store = RecipeStore::new(transport.clone(), toasts());

    let (stale, fresh) = tokio::join!(
        store.fetch_list(ListQuery::page(1)),
        store.fetch_list(ListQuery::page(2)),
    );

    assert_eq!(stale.unwrap().items[0].id, EntityId(1));
    assert_eq!(fresh.unwrap().items[0].id, EntityId(2));
    assert_eq!(store.item_ids(), vec![EntityId(2)]);
    assert_eq!(store.current_query(), Some(ListQuery::page(2)));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn duplicate_ids_in_a_page_are_collapsed() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/recipes",
        recipe_list(
            vec![
                recipe_json(1, false, 0),
                recipe_json(2, false, 0),
                recipe_json(1, true, 9),
            ],
            3,
        ),
    );
    let store = RecipeStore::new(transport.clone(), toasts());

    store.fetch_list(ListQuery::default()).await.unwrap();

    assert_eq!(store.item_ids(), vec![EntityId(1), EntityId(2)]);
}

#[tokio::test]
async fn saved_list_is_held_apart_from_the_main_list() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/recipes",
        recipe_list(vec![recipe_json(1, false, 0)], 1),
    );
    transport.respond(
        Method::Get,
        "/recipes/saved",
        recipe_list(vec![recipe_json(9, false, 0)], 1),
    );
    let store = RecipeStore::new(transport.clone(), toasts());

    store.fetch_list(ListQuery::default()).await.unwrap();
    store.fetch_saved(ListQuery::default()).await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.item_ids(), vec![EntityId(1)]);
    assert_eq!(state.saved[0].id, EntityId(9));
}

#[tokio::test]
async fn resources_without_a_saved_list_reject_fetch_saved_without_a_request() {
    let transport = ScriptedTransport::new();
    let store = TagStore::new(transport.clone(), toasts());

    let error = store.fetch_saved(ListQuery::default()).await.unwrap_err();

    assert_eq!(error.kind, CoreErrorKind::InvalidInput);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn refresh_reuses_the_stored_query() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/recipes", recipe_list(vec![], 0));
    transport.respond(Method::Get, "/recipes", recipe_list(vec![], 0));
    let store = RecipeStore::new(transport.clone(), toasts());

    store.fetch_list(ListQuery::page(3)).await.unwrap();
    store.refresh().await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].query, requests[1].query);
}
