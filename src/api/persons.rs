use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::traits::{Person, PersonPatch, PersonStore};

#[derive(Debug, Deserialize, Default)]
pub struct CreatePerson {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdatePerson {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.store.get_all_persons().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreatePerson>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Person name is required."));
    }

    let id = state
        .store
        .create_person(&body.name, body.description.as_deref(), body.photo.as_deref())
        .await?;
    let person = state
        .store
        .get_person(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("person {id} vanished after insert"))?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError> {
    state
        .store
        .get_person(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Person {id} not found.")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePerson>,
) -> Result<Json<Person>, ApiError> {
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Person name cannot be empty."));
        }
    }

    let patch = PersonPatch {
        name: body.name,
        description: body.description.map(Some),
        photo: body.photo.map(Some),
    };

    if !state.store.update_person(id, &patch).await? {
        return Err(ApiError::not_found(format!("Person {id} not found.")));
    }
    let person = state
        .store
        .get_person(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("person {id} vanished after update"))?;
    Ok(Json(person))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_person(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Person {id} not found.")))
    }
}
