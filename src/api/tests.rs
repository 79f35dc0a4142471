use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::*;
use crate::error::ApiError;
use crate::interpreters::RuleBasedInterpreter;
use crate::server::AppState;
use crate::state::sqlite::tests::setup_test_store;
use crate::traits::{DreamStore, PersonStore, TagStore};

async fn setup_state() -> (AppState, tempfile::NamedTempFile) {
    let (store, db_file) = setup_test_store().await;
    let store = Arc::new(store);
    let interpreter = Arc::new(RuleBasedInterpreter::new(store.clone(), store.clone()));
    (AppState { store, interpreter }, db_file)
}

fn create_dream_body(value: serde_json::Value) -> dreams::CreateDream {
    serde_json::from_value(value).unwrap()
}

fn update_dream_body(value: serde_json::Value) -> dreams::UpdateDream {
    serde_json::from_value(value).unwrap()
}

// ==================== Dream Create ====================

#[tokio::test]
async fn create_dream_defaults_date_to_yesterday() {
    let (state, _db) = setup_state().await;

    let body = create_dream_body(json!({"description": "a quiet lake"}));
    let (status, Json(dream)) = dreams::create(State(state), Json(body)).await.unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dream.dream_date, Some(dreams::yesterday()));
}

#[tokio::test]
async fn create_dream_empty_date_also_defaults() {
    let (state, _db) = setup_state().await;

    let body = create_dream_body(json!({"description": "a quiet lake", "dream_date": ""}));
    let (_, Json(dream)) = dreams::create(State(state), Json(body)).await.unwrap();
    assert_eq!(dream.dream_date, Some(dreams::yesterday()));
}

#[tokio::test]
async fn create_dream_preserves_explicit_date() {
    let (state, _db) = setup_state().await;

    let body = create_dream_body(json!({
        "description": "a storm",
        "dream_date": "2026-08-12"
    }));
    let (_, Json(dream)) = dreams::create(State(state), Json(body)).await.unwrap();
    assert_eq!(dream.dream_date.unwrap().to_string(), "2026-08-12");
}

#[tokio::test]
async fn create_dream_requires_description() {
    let (state, _db) = setup_state().await;

    let body = create_dream_body(json!({"dream_date": "2026-08-12"}));
    let err = dreams::create(State(state.clone()), Json(body)).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // Validation happens before any write.
    assert!(state.store.get_all_dreams().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_dream_rejects_malformed_date() {
    let (state, _db) = setup_state().await;

    let body = create_dream_body(json!({"description": "x", "dream_date": "12/08/2026"}));
    let err = dreams::create(State(state), Json(body)).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn create_dream_accepts_comma_joined_relation_ids() {
    let (state, _db) = setup_state().await;

    let alice = state.store.create_person("Alice", None, None).await.unwrap();
    let bob = state.store.create_person("Bob", None, None).await.unwrap();

    let body = create_dream_body(json!({
        "description": "a dinner party",
        "persons": format!("{alice}, {bob},{bob},bad")
    }));
    let (_, Json(dream)) = dreams::create(State(state), Json(body)).await.unwrap();

    let ids: Vec<i64> = dream.persons.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![alice, bob]);
}

#[tokio::test]
async fn create_dream_accepts_single_scalar_id() {
    let (state, _db) = setup_state().await;

    let tag = state.store.create_tag("lucid", None).await.unwrap();
    let body = create_dream_body(json!({"description": "aware", "tags": tag}));
    let (_, Json(dream)) = dreams::create(State(state), Json(body)).await.unwrap();

    assert_eq!(dream.tags.len(), 1);
    assert_eq!(dream.tags[0].id, tag);
}

#[tokio::test]
async fn create_dream_drops_unknown_relation_ids() {
    let (state, _db) = setup_state().await;

    let alice = state.store.create_person("Alice", None, None).await.unwrap();
    let body = create_dream_body(json!({
        "description": "a crowd",
        "persons": [alice, 999]
    }));
    let (_, Json(dream)) = dreams::create(State(state), Json(body)).await.unwrap();

    let ids: Vec<i64> = dream.persons.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![alice]);
}

// ==================== Dream Update ====================

#[tokio::test]
async fn update_dream_omitting_persons_keeps_them() {
    let (state, _db) = setup_state().await;

    let alice = state.store.create_person("Alice", None, None).await.unwrap();
    let dream_id = state.store.create_dream("a walk", None).await.unwrap();
    state.store.set_dream_persons(dream_id, &[alice]).await.unwrap();

    let body = update_dream_body(json!({"description": "a long walk"}));
    let Json(dream) = dreams::update(State(state), Path(dream_id), Json(body))
        .await
        .unwrap();

    assert_eq!(dream.description, "a long walk");
    assert_eq!(dream.persons.len(), 1);
}

#[tokio::test]
async fn update_dream_with_empty_list_clears_persons() {
    let (state, _db) = setup_state().await;

    let alice = state.store.create_person("Alice", None, None).await.unwrap();
    let dream_id = state.store.create_dream("a walk", None).await.unwrap();
    state.store.set_dream_persons(dream_id, &[alice]).await.unwrap();

    let body = update_dream_body(json!({"persons": []}));
    let Json(dream) = dreams::update(State(state), Path(dream_id), Json(body))
        .await
        .unwrap();

    assert!(dream.persons.is_empty());
}

#[tokio::test]
async fn update_dream_omitting_date_leaves_it_untouched() {
    let (state, _db) = setup_state().await;

    let dream_id = state.store.create_dream("dated", None).await.unwrap();
    let body = update_dream_body(json!({"dream_date": "2026-08-12"}));
    dreams::update(State(state.clone()), Path(dream_id), Json(body))
        .await
        .unwrap();

    // Second update without a date: no yesterday-default sneaks in.
    let body = update_dream_body(json!({"description": "still dated"}));
    let Json(dream) = dreams::update(State(state), Path(dream_id), Json(body))
        .await
        .unwrap();
    assert_eq!(dream.dream_date.unwrap().to_string(), "2026-08-12");
}

#[tokio::test]
async fn update_missing_dream_is_not_found() {
    let (state, _db) = setup_state().await;

    let body = update_dream_body(json!({"description": "ghost"}));
    let err = dreams::update(State(state), Path(999), Json(body))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn destroy_dream_returns_no_content_then_not_found() {
    let (state, _db) = setup_state().await;

    let dream_id = state.store.create_dream("short lived", None).await.unwrap();
    let status = dreams::destroy(State(state.clone()), Path(dream_id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = dreams::retrieve(State(state), Path(dream_id)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ==================== Persons / Tags CRUD ====================

#[tokio::test]
async fn create_person_requires_name() {
    let (state, _db) = setup_state().await;

    let body: persons::CreatePerson = serde_json::from_value(json!({"description": "?"})).unwrap();
    let err = persons::create(State(state), Json(body)).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn person_crud_roundtrip() {
    let (state, _db) = setup_state().await;

    let body: persons::CreatePerson =
        serde_json::from_value(json!({"name": "Alice", "photo": "alice.png"})).unwrap();
    let (status, Json(person)) = persons::create(State(state.clone()), Json(body))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let body: persons::UpdatePerson =
        serde_json::from_value(json!({"description": "friend"})).unwrap();
    let Json(updated) = persons::update(State(state.clone()), Path(person.id), Json(body))
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice");
    assert_eq!(updated.description.as_deref(), Some("friend"));
    assert_eq!(updated.photo.as_deref(), Some("alice.png"));

    let status = persons::destroy(State(state.clone()), Path(person.id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(all) = persons::list(State(state)).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn tag_retrieve_missing_is_not_found() {
    let (state, _db) = setup_state().await;

    let err = tags::retrieve(State(state), Path(42)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ==================== Dashboard ====================

#[tokio::test]
async fn dashboard_chart_arrays_are_index_aligned() {
    let (state, _db) = setup_state().await;

    let alice = state.store.create_person("Alice", None, None).await.unwrap();
    let bob = state.store.create_person("Bob", None, None).await.unwrap();

    for _ in 0..2 {
        let dream = state.store.create_dream("with Alice", None).await.unwrap();
        state.store.set_dream_persons(dream, &[alice]).await.unwrap();
    }
    let dream = state.store.create_dream("with Bob", None).await.unwrap();
    state.store.set_dream_persons(dream, &[bob]).await.unwrap();

    let Json(data) = dashboard::dashboard_data(State(state)).await.unwrap();

    assert_eq!(data.chart_labels, vec!["Alice", "Bob"]);
    assert_eq!(data.chart_data, vec![2, 1]);
    for (i, summary) in data.persons_summary.iter().enumerate() {
        assert_eq!(summary.name, data.chart_labels[i]);
        assert_eq!(summary.qty_dreams, data.chart_data[i]);
    }
}

#[tokio::test]
async fn dashboard_lists_three_latest_dreams() {
    let (state, _db) = setup_state().await;

    for i in 0..5 {
        state
            .store
            .create_dream(&format!("dream {i}"), None)
            .await
            .unwrap();
    }

    let Json(data) = dashboard::dashboard_data(State(state)).await.unwrap();
    assert_eq!(data.latest_dreams.len(), 3);
    assert_eq!(data.latest_dreams[0].description, "dream 4");
}

// ==================== Interpret ====================

#[tokio::test]
async fn interpret_requires_description() {
    let (state, _db) = setup_state().await;

    let body: interpret::InterpretRequest = serde_json::from_value(json!({})).unwrap();
    let err = interpret::interpret(State(state), Json(body)).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn interpret_resolves_suggestions_to_full_records() {
    let (state, _db) = setup_state().await;

    let alice = state.store.create_person("Alice", None, None).await.unwrap();
    let fantasy = state.store.create_tag("fantasy", None).await.unwrap();

    let body: interpret::InterpretRequest = serde_json::from_value(json!({
        "description": "I saw Alice and Bob flying over mountains"
    }))
    .unwrap();
    let Json(response) = interpret::interpret(State(state.clone()), Json(body))
        .await
        .unwrap();

    assert!(response.interpretation.contains("I saw Alice and Bob"));
    assert_eq!(response.suggested_persons.len(), 1);
    assert_eq!(response.suggested_persons[0].id, alice);
    assert_eq!(response.suggested_persons[0].name, "Alice");
    assert_eq!(response.suggested_new_person_names, vec!["Bob".to_string()]);
    assert_eq!(response.suggested_tags.len(), 1);
    assert_eq!(response.suggested_tags[0].id, fantasy);
    assert_eq!(
        response.generated_image_url.as_deref(),
        Some("/static/images/dream_placeholder.png")
    );

    // Read-only: no dream was written.
    assert!(state.store.get_all_dreams().await.unwrap().is_empty());
}
