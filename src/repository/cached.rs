use std::collections::HashMap;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{NewVideo, Tag, TagId, TagRecord, UserId, Video, VideoId},
};

use super::{Store, TagAdmin, TagStore, VideoCatalog, VideoRegistry};

/// Memoizes the catalog and tag snapshot of another store in Redis
///
/// Reads are served from Redis when present and filled in the background on
/// a miss. Writes go to the inner store first, then drop the keys they make
/// stale. A fill racing with a write can still land a stale entry, which then
/// lives until its TTL runs out.
#[derive(Clone)]
pub struct CachedStore<S> {
    inner: S,
    cache: Cache,
    ttl: u64,
}

impl<S: Store> CachedStore<S> {
    pub fn new(inner: S, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

/// Pairs a batch lookup with its IDs, returning the hits and the IDs that
/// missed, in request order
fn split_hits(
    video_ids: &[VideoId],
    hits: Vec<Option<Vec<Tag>>>,
) -> (HashMap<VideoId, Vec<Tag>>, Vec<VideoId>) {
    let mut tags_by_video = HashMap::with_capacity(video_ids.len());
    let mut misses = Vec::new();
    for (&video_id, hit) in video_ids.iter().zip(hits) {
        match hit {
            Some(tags) => {
                tags_by_video.insert(video_id, tags);
            }
            None => misses.push(video_id),
        }
    }
    (tags_by_video, misses)
}

/// Entries to write back for the missed IDs
///
/// Untagged videos get an empty entry so they stop missing.
fn backfill(
    misses: Vec<VideoId>,
    mut loaded: HashMap<VideoId, Vec<Tag>>,
) -> Vec<(VideoId, Vec<Tag>)> {
    misses
        .into_iter()
        .map(|video_id| {
            let tags = loaded.remove(&video_id).unwrap_or_default();
            (video_id, tags)
        })
        .collect()
}

#[async_trait::async_trait]
impl<S: Store> TagStore for CachedStore<S> {
    async fn user_interest_tags(&self, user_id: UserId) -> AppResult<Vec<Tag>> {
        cached!(
            self.cache,
            CacheKey::UserInterests(user_id),
            self.ttl,
            self.inner.user_interest_tags(user_id)
        )
    }

    async fn video_tags(&self, video_id: VideoId) -> AppResult<Vec<Tag>> {
        cached!(
            self.cache,
            CacheKey::VideoTags(video_id),
            self.ttl,
            self.inner.video_tags(video_id)
        )
    }

    async fn video_tags_batch(
        &self,
        video_ids: &[VideoId],
    ) -> AppResult<HashMap<VideoId, Vec<Tag>>> {
        let keys: Vec<CacheKey> = video_ids.iter().map(|id| CacheKey::VideoTags(*id)).collect();
        let hits: Vec<Option<Vec<Tag>>> = self.cache.get_many_from_cache(&keys).await?;
        let (mut tags_by_video, misses) = split_hits(video_ids, hits);

        tracing::debug!(
            hits = tags_by_video.len(),
            misses = misses.len(),
            "Video tag cache lookup"
        );

        if misses.is_empty() {
            return Ok(tags_by_video);
        }

        let loaded = self.inner.video_tags_batch(&misses).await?;
        for (video_id, tags) in backfill(misses, loaded) {
            self.cache
                .set_in_background(&CacheKey::VideoTags(video_id), &tags, self.ttl);
            tags_by_video.insert(video_id, tags);
        }

        Ok(tags_by_video)
    }
}

#[async_trait::async_trait]
impl<S: Store> VideoCatalog for CachedStore<S> {
    async fn all_videos(&self) -> AppResult<Vec<Video>> {
        cached!(self.cache, CacheKey::Catalog, self.ttl, self.inner.all_videos())
    }
}

#[async_trait::async_trait]
impl<S: Store> TagAdmin for CachedStore<S> {
    async fn add_tags(&self, tags: Vec<Tag>) -> AppResult<Vec<TagRecord>> {
        self.inner.add_tags(tags).await
    }

    async fn list_tags(&self) -> AppResult<Vec<TagRecord>> {
        self.inner.list_tags().await
    }

    async fn delete_tag(&self, tag_id: TagId) -> AppResult<bool> {
        let deleted = self.inner.delete_tag(tag_id).await?;
        if deleted {
            // Any user may have selected the tag
            self.cache
                .invalidate_matching(&CacheKey::all_user_interests_pattern())
                .await?;
        }
        Ok(deleted)
    }

    async fn select_interests(&self, user_id: UserId, tag_ids: Vec<TagId>) -> AppResult<Vec<Tag>> {
        let selected = self.inner.select_interests(user_id, tag_ids).await?;
        self.cache
            .invalidate(&[CacheKey::UserInterests(user_id)])
            .await?;
        Ok(selected)
    }
}

#[async_trait::async_trait]
impl<S: Store> VideoRegistry for CachedStore<S> {
    async fn register_video(&self, video: NewVideo) -> AppResult<Video> {
        let stored = self.inner.register_video(video).await?;
        self.cache
            .invalidate(&[CacheKey::Catalog, CacheKey::VideoTags(stored.id)])
            .await?;
        Ok(stored)
    }

    async fn delete_video(&self, video_id: VideoId) -> AppResult<bool> {
        let deleted = self.inner.delete_video(video_id).await?;
        self.cache
            .invalidate(&[CacheKey::Catalog, CacheKey::VideoTags(video_id)])
            .await?;
        Ok(deleted)
    }
}
