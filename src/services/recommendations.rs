use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{Pagination, Tag, UserId, Video, VideoId, VideoSummary},
    repository::{TagStore, VideoCatalog},
    services::matching,
};

/// A catalog video together with its relevance score for one user
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVideo {
    pub video: Video,
    pub score: usize,
}

/// Generates the "for you" list from a user's declared interest tags
///
/// Every catalog video is scored by fuzzy-matching its tags against the
/// user's interests (see [`matching::score`]); zero-score videos are dropped
/// and the rest are ranked by descending score, ties keeping catalog order.
///
/// The engine holds no mutable state. Each call reads a fresh snapshot of
/// interests, catalog and video tags, so concurrent calls are independent.
/// Cost grows as catalog size x tags per video x user interests edit
/// distance computations per request.
#[derive(Clone)]
pub struct RecommendationEngine {
    tags: Arc<dyn TagStore>,
    catalog: Arc<dyn VideoCatalog>,
}

impl RecommendationEngine {
    pub fn new(tags: Arc<dyn TagStore>, catalog: Arc<dyn VideoCatalog>) -> Self {
        Self { tags, catalog }
    }

    /// Returns one page of recommended videos for `user_id`
    ///
    /// `page` is 1-based; non-positive `page` or `limit` fall back to the
    /// defaults. A page past the end, or a user without interests, yields an
    /// empty list. Any failed lookup fails the whole call.
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        user_id: UserId,
        page: i64,
        limit: i64,
    ) -> AppResult<Vec<VideoSummary>> {
        let pagination = Pagination::new(page, limit);

        let interests: BTreeSet<Tag> = self
            .tags
            .user_interest_tags(user_id)
            .await?
            .into_iter()
            .collect();

        if interests.is_empty() {
            tracing::debug!("No interest tags, nothing to recommend");
            return Ok(Vec::new());
        }

        let videos = self.catalog.all_videos().await?;
        let video_ids: Vec<VideoId> = videos.iter().map(|v| v.id).collect();
        let tags_by_video = self.tags.video_tags_batch(&video_ids).await?;

        let ranked = rank(videos, &tags_by_video, &interests);
        let selected = paginate(&ranked, pagination);

        tracing::info!(
            interests = interests.len(),
            catalog_size = video_ids.len(),
            matched = ranked.len(),
            returned = selected.len(),
            page = pagination.page,
            limit = pagination.limit,
            "Recommendations computed"
        );

        Ok(selected)
    }
}

/// Scores every video and orders the non-zero ones by descending score
///
/// The sort is stable, so equal scores keep the order of `videos`. Videos
/// absent from `tags_by_video` have no tags and score zero.
pub fn rank(
    videos: Vec<Video>,
    tags_by_video: &HashMap<VideoId, Vec<Tag>>,
    interests: &BTreeSet<Tag>,
) -> Vec<ScoredVideo> {
    let mut ranked: Vec<ScoredVideo> = videos
        .into_iter()
        .filter_map(|video| {
            let video_tags = tags_by_video.get(&video.id)?;
            let score = matching::score(video_tags, interests);
            (score > 0).then_some(ScoredVideo { video, score })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Cuts one page out of a ranked list
pub fn paginate(ranked: &[ScoredVideo], pagination: Pagination) -> Vec<VideoSummary> {
    match pagination.window(ranked.len()) {
        Some((start, end)) => ranked[start..end]
            .iter()
            .map(|scored| VideoSummary::from(&scored.video))
            .collect(),
        None => Vec::new(),
    }
}
