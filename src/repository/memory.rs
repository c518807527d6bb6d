use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{NewVideo, Tag, TagId, TagRecord, UserId, Video, VideoId},
};

use super::{dedup_tags, TagAdmin, TagStore, VideoCatalog, VideoRegistry};

/// Process-local store for development runs and tests
///
/// Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Tag dictionary keyed by ID
    tags: BTreeMap<TagId, Tag>,
    /// Interest selections as dictionary IDs, per user
    user_tags: HashMap<UserId, Vec<TagId>>,
    videos: BTreeMap<VideoId, Video>,
    video_tags: HashMap<VideoId, Vec<Tag>>,
    next_tag_id: TagId,
    next_video_id: VideoId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TagStore for MemoryStore {
    async fn user_interest_tags(&self, user_id: UserId) -> AppResult<Vec<Tag>> {
        let inner = self.inner.read().await;
        let selected = inner
            .user_tags
            .get(&user_id)
            .map(|ids| ids.iter().filter_map(|id| inner.tags.get(id).cloned()))
            .into_iter()
            .flatten();
        Ok(dedup_tags(selected))
    }

    async fn video_tags(&self, video_id: VideoId) -> AppResult<Vec<Tag>> {
        let inner = self.inner.read().await;
        Ok(inner.video_tags.get(&video_id).cloned().unwrap_or_default())
    }

    async fn video_tags_batch(
        &self,
        video_ids: &[VideoId],
    ) -> AppResult<HashMap<VideoId, Vec<Tag>>> {
        let inner = self.inner.read().await;
        Ok(video_ids
            .iter()
            .filter_map(|id| inner.video_tags.get(id).map(|tags| (*id, tags.clone())))
            .collect())
    }
}

#[async_trait::async_trait]
impl VideoCatalog for MemoryStore {
    async fn all_videos(&self) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        Ok(inner.videos.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl TagAdmin for MemoryStore {
    async fn add_tags(&self, tags: Vec<Tag>) -> AppResult<Vec<TagRecord>> {
        let mut inner = self.inner.write().await;
        let mut records = Vec::with_capacity(tags.len());

        for tag in dedup_tags(tags) {
            let existing = inner
                .tags
                .iter()
                .find(|(_, stored)| **stored == tag)
                .map(|(id, _)| *id);

            let id = match existing {
                Some(id) => id,
                None => {
                    inner.next_tag_id += 1;
                    let id = inner.next_tag_id;
                    inner.tags.insert(id, tag.clone());
                    id
                }
            };
            records.push(TagRecord { id, tag });
        }

        Ok(records)
    }

    async fn list_tags(&self) -> AppResult<Vec<TagRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tags
            .iter()
            .map(|(id, tag)| TagRecord {
                id: *id,
                tag: tag.clone(),
            })
            .collect())
    }

    async fn delete_tag(&self, tag_id: TagId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        if inner.tags.remove(&tag_id).is_none() {
            return Ok(false);
        }
        for selected in inner.user_tags.values_mut() {
            selected.retain(|id| *id != tag_id);
        }
        Ok(true)
    }

    async fn select_interests(&self, user_id: UserId, tag_ids: Vec<TagId>) -> AppResult<Vec<Tag>> {
        let mut inner = self.inner.write().await;

        if let Some(missing) = tag_ids.iter().find(|id| !inner.tags.contains_key(*id)) {
            return Err(AppError::NotFound(format!("tag {}", missing)));
        }

        let mut ids = tag_ids;
        ids.sort_unstable();
        ids.dedup();

        let tags = ids.iter().filter_map(|id| inner.tags.get(id).cloned());
        let selected = dedup_tags(tags);
        inner.user_tags.insert(user_id, ids);

        Ok(selected)
    }
}

#[async_trait::async_trait]
impl VideoRegistry for MemoryStore {
    async fn register_video(&self, video: NewVideo) -> AppResult<Video> {
        let mut inner = self.inner.write().await;
        inner.next_video_id += 1;

        let stored = Video {
            id: inner.next_video_id,
            user_id: video.user_id,
            title: video.title,
            description: video.description,
            url: video.url,
            created_at: Utc::now(),
        };

        inner.videos.insert(stored.id, stored.clone());
        inner.video_tags.insert(stored.id, dedup_tags(video.tags));

        Ok(stored)
    }

    async fn delete_video(&self, video_id: VideoId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        inner.video_tags.remove(&video_id);
        Ok(inner.videos.remove(&video_id).is_some())
    }
}
