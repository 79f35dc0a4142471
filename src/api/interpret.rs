use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::AppState;
use crate::traits::{Person, PersonStore, Tag, TagStore};

#[derive(Debug, Deserialize, Default)]
pub struct InterpretRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    pub interpretation: String,
    pub suggested_persons: Vec<Person>,
    pub suggested_new_person_names: Vec<String>,
    pub suggested_tags: Vec<Tag>,
    pub generated_image_url: Option<String>,
}

/// Run the interpretation engine over a piece of free text and resolve the
/// suggested ids into full records. Read-only — nothing is persisted.
pub async fn interpret(
    State(state): State<AppState>,
    Json(body): Json<InterpretRequest>,
) -> Result<Json<InterpretResponse>, ApiError> {
    if body.description.trim().is_empty() {
        return Err(ApiError::validation(
            "Dream description is required for interpretation.",
        ));
    }

    let suggestions = state.interpreter.analyze(&body.description).await?;
    let generated_image_url = state
        .interpreter
        .generate_image(&body.description, Some(&suggestions.interpretation))
        .await?;

    let suggested_persons = state.store.get_persons_by_ids(&suggestions.person_ids).await?;
    let suggested_tags = state.store.get_tags_by_ids(&suggestions.tag_ids).await?;

    Ok(Json(InterpretResponse {
        interpretation: suggestions.interpretation,
        suggested_persons,
        suggested_new_person_names: suggestions.new_person_names,
        suggested_tags,
        generated_image_url,
    }))
}
