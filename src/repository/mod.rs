//! Data sources behind the recommendation engine and the tag/catalog admin
//! operations
//!
//! The engine only reads ([`TagStore`], [`VideoCatalog`]). Admin and interest
//! selection write through [`TagAdmin`] and [`VideoRegistry`]. Every store in
//! this module implements all four so a single instance can be shared.

use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{NewVideo, Tag, TagId, TagRecord, UserId, Video, VideoId},
};

pub mod cached;
pub mod memory;
pub mod postgres;

pub use cached::CachedStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Read access to the tags attached to users and videos
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TagStore: Send + Sync {
    /// Distinct interest tags a user has selected
    ///
    /// An unknown user and a user without interests both yield an empty list.
    async fn user_interest_tags(&self, user_id: UserId) -> AppResult<Vec<Tag>>;

    /// Tags assigned to one video
    async fn video_tags(&self, video_id: VideoId) -> AppResult<Vec<Tag>>;

    /// Tags for many videos at once
    ///
    /// Default implementation calls `video_tags` for each ID in turn and fails
    /// on the first error. Stores override this with a single bulk lookup.
    /// Videos without tags may be missing from the map.
    async fn video_tags_batch(
        &self,
        video_ids: &[VideoId],
    ) -> AppResult<HashMap<VideoId, Vec<Tag>>> {
        let mut tags_by_video = HashMap::with_capacity(video_ids.len());
        for &video_id in video_ids {
            let tags = self.video_tags(video_id).await?;
            tags_by_video.insert(video_id, tags);
        }
        Ok(tags_by_video)
    }
}

/// Read access to the published video catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Every published video, in a stable order (ascending ID)
    async fn all_videos(&self) -> AppResult<Vec<Video>>;
}

/// Tag dictionary management and interest selection
#[async_trait::async_trait]
pub trait TagAdmin: Send + Sync {
    /// Adds tags to the dictionary. Tags already present return their
    /// existing record.
    async fn add_tags(&self, tags: Vec<Tag>) -> AppResult<Vec<TagRecord>>;

    async fn list_tags(&self) -> AppResult<Vec<TagRecord>>;

    /// Removes a tag and every user selection of it. Returns false when no
    /// such tag exists.
    async fn delete_tag(&self, tag_id: TagId) -> AppResult<bool>;

    /// Replaces a user's interests with the given dictionary tags and returns
    /// the resulting interest tags
    ///
    /// Fails with `NotFound` if any ID is not in the dictionary.
    async fn select_interests(&self, user_id: UserId, tag_ids: Vec<TagId>) -> AppResult<Vec<Tag>>;
}

/// Catalog registration
#[async_trait::async_trait]
pub trait VideoRegistry: Send + Sync {
    /// Stores video metadata and its tag set
    async fn register_video(&self, video: NewVideo) -> AppResult<Video>;

    /// Removes a video and its tag assignments. Returns false when no such
    /// video exists.
    async fn delete_video(&self, video_id: VideoId) -> AppResult<bool>;
}

/// A store usable for every operation the service exposes
pub trait Store: TagStore + VideoCatalog + TagAdmin + VideoRegistry {}

impl<T> Store for T where T: TagStore + VideoCatalog + TagAdmin + VideoRegistry {}

/// Keeps the first occurrence of each tag, preserving order
pub(crate) fn dedup_tags(tags: impl IntoIterator<Item = Tag>) -> Vec<Tag> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
