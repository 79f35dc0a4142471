use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::traits::{Dream, DreamStore, PersonDreamCount, PersonStore};

const LATEST_DREAMS: i64 = 3;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub latest_dreams: Vec<Dream>,
    pub persons_summary: Vec<PersonDreamCount>,
    pub chart_labels: Vec<String>,
    pub chart_data: Vec<i64>,
}

/// Aggregated read-only projection: the most recently logged dreams plus
/// per-person dream counts, with labels and data index-aligned for charting.
pub async fn dashboard_data(
    State(state): State<AppState>,
) -> Result<Json<DashboardData>, ApiError> {
    let latest_dreams = state.store.latest_dreams(LATEST_DREAMS).await?;
    let persons_summary = state.store.person_dream_counts().await?;

    let chart_labels = persons_summary.iter().map(|p| p.name.clone()).collect();
    let chart_data = persons_summary.iter().map(|p| p.qty_dreams).collect();

    Ok(Json(DashboardData {
        latest_dreams,
        persons_summary,
        chart_labels,
        chart_data,
    }))
}
