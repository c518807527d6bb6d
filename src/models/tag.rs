use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub type TagId = i64;

/// A free-text topical label attached to users (interests) and videos
///
/// Only the string value takes part in matching. The value is kept exactly as
/// stored: case and whitespace are significant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry in the tag dictionary managed by admins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: TagId,
    pub tag: Tag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_serializes_as_plain_string() {
        let tag = Tag::from("gaming");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"gaming\"");

        let parsed: Tag = serde_json::from_str("\"Cats \"").unwrap();
        assert_eq!(parsed.as_str(), "Cats ");
    }

    #[test]
    fn test_tag_equality_is_case_sensitive() {
        assert_ne!(Tag::from("Music"), Tag::from("music"));
    }

    #[test]
    fn test_tag_record_shape() {
        let record = TagRecord {
            id: 3,
            tag: Tag::from("travel"),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["tag"], "travel");
    }
}
