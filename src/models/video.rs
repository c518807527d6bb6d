use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;

pub type VideoId = i64;
pub type UserId = i64;

/// A published video in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: VideoId,
    /// Owner (uploader) of the video
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    /// Playback URL
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A recommended video as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: VideoId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub url: String,
}

impl From<&Video> for VideoSummary {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id,
            user_id: video.user_id,
            title: video.title.clone(),
            description: video.description.clone(),
            url: video.url.clone(),
        }
    }
}

/// Metadata for registering a video in the catalog
///
/// The media itself is already stored; `url` points at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVideo {
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_drops_timestamps() {
        let video = Video {
            id: 42,
            user_id: 7,
            title: "Cat compilation".to_string(),
            description: "Cats being cats".to_string(),
            url: "https://cdn.example.com/v/42.mp4".to_string(),
            created_at: Utc::now(),
        };

        let summary = VideoSummary::from(&video);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["url"], "https://cdn.example.com/v/42.mp4");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_new_video_defaults_optional_fields() {
        let json = r#"{ "user_id": 1, "title": "Intro", "url": "https://cdn.example.com/1.mp4" }"#;
        let video: NewVideo = serde_json::from_str(json).unwrap();
        assert_eq!(video.description, "");
        assert!(video.tags.is_empty());
    }
}
