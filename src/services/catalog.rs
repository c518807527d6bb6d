//! Tag dictionary, interest selection and catalog registration
//!
//! Input checks live here; persistence is delegated to the injected store.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{NewVideo, Tag, TagId, TagRecord, UserId, Video, VideoId},
    repository::{TagAdmin, TagStore, VideoRegistry},
};

/// Drops empty strings from admin-entered tags
///
/// Everything else is kept byte for byte, surrounding whitespace included,
/// since matching compares stored values as-is.
fn clean_tags(raw: impl IntoIterator<Item = String>) -> Vec<Tag> {
    raw.into_iter()
        .filter(|t| !t.is_empty())
        .map(Tag::from)
        .collect()
}

/// Adds tags to the dictionary
pub async fn add_tags(admin: Arc<dyn TagAdmin>, raw: Vec<String>) -> AppResult<Vec<TagRecord>> {
    let tags = clean_tags(raw);
    if tags.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one non-empty tag is required".to_string(),
        ));
    }

    let records = admin.add_tags(tags).await?;
    tracing::info!(count = records.len(), "Tags added");
    Ok(records)
}

pub async fn list_tags(admin: Arc<dyn TagAdmin>) -> AppResult<Vec<TagRecord>> {
    admin.list_tags().await
}

pub async fn delete_tag(admin: Arc<dyn TagAdmin>, tag_id: TagId) -> AppResult<()> {
    if !admin.delete_tag(tag_id).await? {
        return Err(AppError::NotFound(format!("tag {}", tag_id)));
    }
    tracing::info!(tag_id, "Tag deleted");
    Ok(())
}

/// Replaces a user's interest tags with the given dictionary entries
pub async fn select_interests(
    admin: Arc<dyn TagAdmin>,
    user_id: UserId,
    tag_ids: Vec<TagId>,
) -> AppResult<Vec<Tag>> {
    if tag_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one tag id is required".to_string(),
        ));
    }
    admin.select_interests(user_id, tag_ids).await
}

pub async fn user_interests(tags: Arc<dyn TagStore>, user_id: UserId) -> AppResult<Vec<Tag>> {
    tags.user_interest_tags(user_id).await
}

/// Registers an already-stored video in the catalog
pub async fn register_video(registry: Arc<dyn VideoRegistry>, video: NewVideo) -> AppResult<Video> {
    if video.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }
    if video.url.trim().is_empty() {
        return Err(AppError::InvalidInput("url is required".to_string()));
    }

    let video = NewVideo {
        tags: clean_tags(video.tags.into_iter().map(Tag::into_inner)),
        ..video
    };
    registry.register_video(video).await
}

pub async fn delete_video(registry: Arc<dyn VideoRegistry>, video_id: VideoId) -> AppResult<()> {
    if !registry.delete_video(video_id).await? {
        return Err(AppError::NotFound(format!("video {}", video_id)));
    }
    tracing::info!(video_id, "Video deleted");
    Ok(())
}
