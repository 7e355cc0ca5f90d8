use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a reader's comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub content: String,
    pub author_name: String,
}
