use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::traits::{Tag, TagPatch, TagStore};

#[derive(Debug, Deserialize, Default)]
pub struct CreateTag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.store.get_all_tags().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTag>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Tag name is required."));
    }

    let id = state
        .store
        .create_tag(&body.name, body.description.as_deref())
        .await?;
    let tag = state
        .store
        .get_tag(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("tag {id} vanished after insert"))?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    state
        .store
        .get_tag(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Tag {id} not found.")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTag>,
) -> Result<Json<Tag>, ApiError> {
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Tag name cannot be empty."));
        }
    }

    let patch = TagPatch {
        name: body.name,
        description: body.description.map(Some),
    };

    if !state.store.update_tag(id, &patch).await? {
        return Err(ApiError::not_found(format!("Tag {id} not found.")));
    }
    let tag = state
        .store
        .get_tag(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("tag {id} vanished after update"))?;
    Ok(Json(tag))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_tag(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Tag {id} not found.")))
    }
}
