use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;
use crate::normalize::{relation_ids, RelationIds};
use crate::server::AppState;
use crate::traits::{Dream, DreamPatch, DreamStore};

#[derive(Debug, Deserialize, Default)]
pub struct CreateDream {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dream_date: Option<String>,
    /// List of ids, comma-joined id string, or a single bare id.
    #[serde(default)]
    pub persons: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateDream {
    pub description: Option<String>,
    pub dream_date: Option<String>,
    pub persons: Option<serde_json::Value>,
    pub tags: Option<serde_json::Value>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Dream>>, ApiError> {
    Ok(Json(state.store.get_all_dreams().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateDream>,
) -> Result<(StatusCode, Json<Dream>), ApiError> {
    if body.description.trim().is_empty() {
        return Err(ApiError::validation("Dream description is required."));
    }

    // "Log yesterday's dream": an absent or empty date is a product default,
    // not an error.
    let dream_date = match body.dream_date.as_deref() {
        Some(s) if !s.is_empty() => Some(parse_dream_date(s)?),
        _ => Some(yesterday()),
    };

    let id = state.store.create_dream(&body.description, dream_date).await?;
    reconcile_relations(&state, id, body.persons.as_ref(), body.tags.as_ref()).await?;

    let dream = state
        .store
        .get_dream(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("dream {id} vanished after insert"))?;
    Ok((StatusCode::CREATED, Json(dream)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Dream>, ApiError> {
    state
        .store
        .get_dream(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Dream {id} not found.")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateDream>,
) -> Result<Json<Dream>, ApiError> {
    if let Some(description) = &body.description {
        if description.trim().is_empty() {
            return Err(ApiError::validation("Dream description cannot be empty."));
        }
    }

    // No yesterday-default on update: an omitted (or empty) date leaves the
    // stored value untouched.
    let dream_date = match body.dream_date.as_deref() {
        Some(s) if !s.is_empty() => Some(parse_dream_date(s)?),
        _ => None,
    };

    let patch = DreamPatch {
        description: body.description,
        dream_date,
    };

    if !state.store.update_dream(id, &patch).await? {
        return Err(ApiError::not_found(format!("Dream {id} not found.")));
    }
    reconcile_relations(&state, id, body.persons.as_ref(), body.tags.as_ref()).await?;

    let dream = state
        .store
        .get_dream(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("dream {id} vanished after update"))?;
    Ok(Json(dream))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_dream(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Dream {id} not found.")))
    }
}

/// Apply the absent-vs-empty relation semantics for both membership sets.
/// Absent means no change; anything else replaces the set outright (unknown
/// ids are dropped by the store, not surfaced).
async fn reconcile_relations(
    state: &AppState,
    dream_id: i64,
    persons: Option<&serde_json::Value>,
    tags: Option<&serde_json::Value>,
) -> Result<(), ApiError> {
    if let RelationIds::Ids(ids) = relation_ids(persons) {
        state.store.set_dream_persons(dream_id, &ids).await?;
    }
    if let RelationIds::Ids(ids) = relation_ids(tags) {
        state.store.set_dream_tags(dream_id, &ids).await?;
    }
    Ok(())
}

fn parse_dream_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid dream_date '{s}', expected YYYY-MM-DD.")))
}

pub(crate) fn yesterday() -> NaiveDate {
    chrono::Local::now().date_naive() - chrono::Duration::days(1)
}
