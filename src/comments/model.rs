use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A comment as the server returns it, replies already nested.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub replies: Vec<Comment>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let replies: Option<Vec<Comment>> = Option::deserialize(deserializer)?;
    Ok(replies.unwrap_or_default())
}

/// Body of the create request. `parent_id` is left out entirely for
/// top-level comments.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewComment {
    pub post_slug: String,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

pub fn count_all(comments: &[Comment]) -> usize {
    comments.iter().map(|comment| 1 + count_all(&comment.replies)).sum()
}

impl Comment {
    /// True when this comment or any of its descendants has `id`.
    pub fn contains(&self, id: i64) -> bool {
        self.id == id || self.replies.iter().any(|reply| reply.contains(id))
    }
}

/// Depth-first lookup returning the comment and its depth (0 = top level).
pub fn find_comment(comments: &[Comment], id: i64) -> Option<(&Comment, usize)> {
    fn walk(comments: &[Comment], id: i64, depth: usize) -> Option<(&Comment, usize)> {
        for comment in comments {
            if comment.id == id {
                return Some((comment, depth));
            }
            if let Some(found) = walk(&comment.replies, id, depth + 1) {
                return Some(found);
            }
        }
        None
    }

    walk(comments, id, 0)
}
