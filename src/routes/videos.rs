use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    middleware::identity::AdminUser,
    models::{NewVideo, Video, VideoId},
    routes::AppState,
    services::catalog,
};

/// Adds an already-uploaded video and its tags to the catalog
pub async fn register_video(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(video): Json<NewVideo>,
) -> AppResult<(StatusCode, Json<Video>)> {
    let video = catalog::register_video(state.registry, video).await?;
    tracing::info!(admin_id = admin.user_id, video_id = video.id, "Video registered");
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn delete_video(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(video_id): Path<VideoId>,
) -> AppResult<StatusCode> {
    catalog::delete_video(state.registry, video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
