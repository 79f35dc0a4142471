use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::api;
use crate::config::ServerConfig;
use crate::state::sqlite::SqliteStateStore;
use crate::traits::DreamInterpreter;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteStateStore>,
    pub interpreter: Arc<dyn DreamInterpreter>,
}

pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        .route(
            "/persons/",
            get(api::persons::list).post(api::persons::create),
        )
        .route(
            "/persons/{id}/",
            get(api::persons::retrieve)
                .put(api::persons::update)
                .patch(api::persons::update)
                .delete(api::persons::destroy),
        )
        .route("/tags/", get(api::tags::list).post(api::tags::create))
        .route(
            "/tags/{id}/",
            get(api::tags::retrieve)
                .put(api::tags::update)
                .patch(api::tags::update)
                .delete(api::tags::destroy),
        )
        .route("/dreams/", get(api::dreams::list).post(api::dreams::create))
        .route(
            "/dreams/{id}/",
            get(api::dreams::retrieve)
                .put(api::dreams::update)
                .patch(api::dreams::update)
                .delete(api::dreams::destroy),
        )
        .route("/dashboard/", get(api::dashboard::dashboard_data))
        .route("/interpret/", axum::routing::post(api::interpret::interpret));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", v1)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub async fn serve(
    config: &ServerConfig,
    store: Arc<SqliteStateStore>,
    interpreter: Arc<dyn DreamInterpreter>,
) -> anyhow::Result<()> {
    let app = build_router(AppState { store, interpreter });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
