use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::identity::{AdminUser, AuthUser},
    models::{Tag, TagId, TagRecord},
    routes::AppState,
    services::catalog,
};

#[derive(Debug, Deserialize)]
pub struct AddTagsRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectInterestsRequest {
    pub tag_ids: Vec<TagId>,
}

/// Lists the tag dictionary users pick interests from
pub async fn list_tags(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<TagRecord>>> {
    let tags = catalog::list_tags(state.admin).await?;
    Ok(Json(tags))
}

/// Returns the caller's interest tags
pub async fn get_interests(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Tag>>> {
    let tags = catalog::user_interests(state.tags, user.user_id).await?;
    Ok(Json(tags))
}

/// Replaces the caller's interest tags
pub async fn select_interests(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SelectInterestsRequest>,
) -> AppResult<Json<Vec<Tag>>> {
    let tags = catalog::select_interests(state.admin, user.user_id, request.tag_ids).await?;
    tracing::info!(user_id = user.user_id, count = tags.len(), "Interests updated");
    Ok(Json(tags))
}

pub async fn add_tags(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<AddTagsRequest>,
) -> AppResult<(StatusCode, Json<Vec<TagRecord>>)> {
    tracing::info!(admin_id = admin.user_id, "Adding tags");
    let records = catalog::add_tags(state.admin, request.tags).await?;
    Ok((StatusCode::CREATED, Json(records)))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(tag_id): Path<TagId>,
) -> AppResult<StatusCode> {
    catalog::delete_tag(state.admin, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
