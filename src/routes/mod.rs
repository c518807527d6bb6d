use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    repository::{Store, TagAdmin, TagStore, VideoCatalog, VideoRegistry},
    services::RecommendationEngine,
};

pub mod recommendations;
pub mod tags;
pub mod videos;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
    pub tags: Arc<dyn TagStore>,
    pub admin: Arc<dyn TagAdmin>,
    pub registry: Arc<dyn VideoRegistry>,
}

impl AppState {
    /// Wires every handle to one shared store
    pub fn from_store<S: Store + 'static>(store: S) -> Self {
        let store = Arc::new(store);
        let tags: Arc<dyn TagStore> = store.clone();
        let catalog: Arc<dyn VideoCatalog> = store.clone();

        Self {
            engine: RecommendationEngine::new(tags.clone(), catalog),
            tags,
            admin: store.clone(),
            registry: store,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/tags", get(tags::list_tags))
        .route(
            "/interests",
            get(tags::get_interests).put(tags::select_interests),
        )
        .nest("/admin", admin_routes())
}

/// Admin routes under /api/v1/admin
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", post(tags::add_tags))
        .route("/tags/:id", delete(tags::delete_tag))
        .route("/videos", post(videos::register_video))
        .route("/videos/:id", delete(videos::delete_video))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "timestamp": Utc::now() })),
    )
}
