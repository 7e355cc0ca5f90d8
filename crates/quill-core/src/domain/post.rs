use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, User, require_non_blank};
use crate::error::DomainError;

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post together with its author and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub comments: Vec<Comment>,
}

/// Fields required to create a post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    /// Defaults to published.
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("title", &self.title)
    }
}

/// Partial patch for a post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

impl PostChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.title {
            Some(title) => require_non_blank("title", title),
            None => Ok(()),
        }
    }

    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(is_published) = self.is_published {
            post.is_published = is_published;
        }
    }
}
