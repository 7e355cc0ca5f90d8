use std::sync::Arc;

use crate::domain::{Comment, NewComment, require_non_blank};
use crate::error::DomainError;
use crate::ports::CommentRepository;

/// Comment operations.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    pub async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, DomainError> {
        require_non_blank("content", &new_comment.content)?;
        require_non_blank("authorName", &new_comment.author_name)?;
        Ok(self.comments.create(new_comment).await?)
    }

    pub async fn get_comments_by_post(&self, post_id: i32) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.find_by_post_id(post_id).await?)
    }

    pub async fn delete_comment(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.comments.delete(id).await?)
    }
}
