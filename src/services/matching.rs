//! Fuzzy tag matching
//!
//! Two tags match when their Levenshtein distance is at most
//! [`MATCH_THRESHOLD`]. Tags are compared exactly as stored: no case folding,
//! no trimming.

use crate::models::Tag;

/// Maximum edit distance at which two tags still count as a match
pub const MATCH_THRESHOLD: usize = 2;

/// Minimum number of single-character insertions, deletions or substitutions
/// turning `a` into `b`
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein::levenshtein(a, b)
}

/// Whether two tags are close enough to be considered the same topic
pub fn tags_match(a: &str, b: &str) -> bool {
    // Lengths alone can rule a pair out before running the DP
    let (la, lb) = (a.chars().count(), b.chars().count());
    if la.abs_diff(lb) > MATCH_THRESHOLD {
        return false;
    }
    edit_distance(a, b) <= MATCH_THRESHOLD
}

/// Relevance of a video to a user
///
/// Counts every matching (video tag, user tag) pair. A video tag close to
/// several interests scores once per interest, and several video tags close
/// to one interest each score. The result is bounded by
/// `video_tags.len() * user_tags.len()`.
pub fn score<'a, V, U>(video_tags: V, user_tags: U) -> usize
where
    V: IntoIterator<Item = &'a Tag>,
    U: IntoIterator<Item = &'a Tag> + Clone,
{
    video_tags
        .into_iter()
        .map(|video_tag| {
            user_tags
                .clone()
                .into_iter()
                .filter(|user_tag| tags_match(video_tag.as_str(), user_tag.as_str()))
                .count()
        })
        .sum()
}
