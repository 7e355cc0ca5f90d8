use std::sync::Arc;

use crate::domain::{NewPost, Post, PostChanges, PostDetails};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::PostRepository;

/// Post operations.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, DomainError> {
        new_post.validate()?;
        Ok(self.posts.create(new_post).await?)
    }

    pub async fn get_post_by_id(&self, id: i32) -> Result<Option<PostDetails>, DomainError> {
        Ok(self.posts.find_with_relations(id).await?)
    }

    pub async fn get_all_posts(
        &self,
        request: PageRequest,
    ) -> Result<Page<PostDetails>, DomainError> {
        Ok(self.posts.find_page(request).await?)
    }

    pub async fn get_posts_by_user(&self, user_id: i32) -> Result<Vec<PostDetails>, DomainError> {
        Ok(self.posts.find_by_user_id(user_id).await?)
    }

    pub async fn update_post(
        &self,
        id: i32,
        changes: PostChanges,
    ) -> Result<Option<PostDetails>, DomainError> {
        changes.validate()?;
        self.posts.update(id, changes).await?;
        self.get_post_by_id(id).await
    }

    pub async fn delete_post(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.posts.delete(id).await?)
    }
}
