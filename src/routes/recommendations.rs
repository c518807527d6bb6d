use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::{identity::AuthUser, request_id::RequestId},
    models::{PageQuery, VideoSummary},
    routes::AppState,
};

/// Handler for the "for you" recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<VideoSummary>>> {
    tracing::info!(
        request_id = %request_id,
        user_id = user.user_id,
        page = ?query.page,
        limit = ?query.limit,
        "Processing recommendation request"
    );

    let videos = state
        .engine
        .recommend(user.user_id, query.page(), query.limit())
        .await?;

    Ok(Json(videos))
}
