use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{NewVideo, Tag, TagId, TagRecord, UserId, Video, VideoId},
};

use super::{dedup_tags, TagAdmin, TagStore, VideoCatalog, VideoRegistry};

/// Postgres-backed store over the `tags`, `user_tags`, `videos` and
/// `video_tags` tables
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_tags(values: Vec<String>) -> Vec<Tag> {
    values.into_iter().map(Tag::from).collect()
}

#[async_trait::async_trait]
impl TagStore for PgStore {
    async fn user_interest_tags(&self, user_id: UserId) -> AppResult<Vec<Tag>> {
        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT tags.tag
            FROM user_tags
            INNER JOIN tags ON user_tags.tag_id = tags.id
            WHERE user_tags.user_id = $1
            ORDER BY tags.tag
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_tags(tags))
    }

    async fn video_tags(&self, video_id: VideoId) -> AppResult<Vec<Tag>> {
        let tags: Vec<String> =
            sqlx::query_scalar("SELECT tag FROM video_tags WHERE video_id = $1 ORDER BY tag")
                .bind(video_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(into_tags(tags))
    }

    async fn video_tags_batch(
        &self,
        video_ids: &[VideoId],
    ) -> AppResult<HashMap<VideoId, Vec<Tag>>> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(VideoId, String)> = sqlx::query_as(
            r#"
            SELECT video_id, tag
            FROM video_tags
            WHERE video_id = ANY($1)
            ORDER BY video_id, tag
            "#,
        )
        .bind(video_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_video: HashMap<VideoId, Vec<Tag>> = HashMap::new();
        for (video_id, tag) in rows {
            tags_by_video
                .entry(video_id)
                .or_default()
                .push(Tag::from(tag));
        }

        tracing::debug!(
            requested = video_ids.len(),
            tagged = tags_by_video.len(),
            "Loaded video tags"
        );

        Ok(tags_by_video)
    }
}

#[async_trait::async_trait]
impl VideoCatalog for PgStore {
    async fn all_videos(&self) -> AppResult<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, url, created_at
            FROM videos
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}

#[async_trait::async_trait]
impl TagAdmin for PgStore {
    async fn add_tags(&self, tags: Vec<Tag>) -> AppResult<Vec<TagRecord>> {
        let mut tx = self.pool.begin().await?;
        let mut records = Vec::with_capacity(tags.len());

        for tag in dedup_tags(tags) {
            // The no-op update makes RETURNING yield the existing row on conflict
            let id: TagId = sqlx::query_scalar(
                r#"
                INSERT INTO tags (tag) VALUES ($1)
                ON CONFLICT (tag) DO UPDATE SET tag = EXCLUDED.tag
                RETURNING id
                "#,
            )
            .bind(tag.as_str())
            .fetch_one(&mut *tx)
            .await?;

            records.push(TagRecord { id, tag });
        }

        tx.commit().await?;
        Ok(records)
    }

    async fn list_tags(&self) -> AppResult<Vec<TagRecord>> {
        let rows: Vec<(TagId, String)> = sqlx::query_as("SELECT id, tag FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, tag)| TagRecord {
                id,
                tag: Tag::from(tag),
            })
            .collect())
    }

    async fn delete_tag(&self, tag_id: TagId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn select_interests(&self, user_id: UserId, tag_ids: Vec<TagId>) -> AppResult<Vec<Tag>> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<(TagId, String)> =
            sqlx::query_as("SELECT id, tag FROM tags WHERE id = ANY($1) ORDER BY id")
                .bind(&tag_ids)
                .fetch_all(&mut *tx)
                .await?;

        let found: HashSet<TagId> = rows.iter().map(|(id, _)| *id).collect();
        if let Some(missing) = tag_ids.iter().find(|id| !found.contains(*id)) {
            return Err(AppError::NotFound(format!("tag {}", missing)));
        }

        sqlx::query("DELETE FROM user_tags WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO user_tags (user_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&tag_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(user_id, selected = rows.len(), "Stored user interests");

        Ok(dedup_tags(rows.into_iter().map(|(_, tag)| Tag::from(tag))))
    }
}

#[async_trait::async_trait]
impl VideoRegistry for PgStore {
    async fn register_video(&self, video: NewVideo) -> AppResult<Video> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (user_id, title, description, url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, url, created_at
            "#,
        )
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.url)
        .fetch_one(&mut *tx)
        .await?;

        let tags: Vec<String> = dedup_tags(video.tags)
            .into_iter()
            .map(Tag::into_inner)
            .collect();

        sqlx::query(
            r#"
            INSERT INTO video_tags (video_id, tag)
            SELECT $1, UNNEST($2::TEXT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(stored.id)
        .bind(&tags)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(video_id = stored.id, tags = tags.len(), "Registered video");

        Ok(stored)
    }

    async fn delete_video(&self, video_id: VideoId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
