use async_trait::async_trait;

use crate::domain::{
    Comment, NewComment, NewPost, NewRole, NewUser, Post, PostChanges, PostDetails, Role, User,
    UserChanges, UserDetails,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Returns whether a row was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// User repository. Deleting a user cascades to its posts and their comments.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    /// Insert a new user. Fails with `RepoError::Constraint` on a duplicate email.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Find a user with posts and roles loaded.
    async fn find_with_relations(&self, id: i32) -> Result<Option<UserDetails>, RepoError>;

    /// Users ordered by creation time, newest first.
    async fn find_page(&self, request: PageRequest) -> Result<Page<UserDetails>, RepoError>;

    /// Apply a partial patch. Updating a missing id is not an error.
    async fn update(&self, id: i32, changes: UserChanges) -> Result<(), RepoError>;

    /// Atomically add a role to a user's role set.
    ///
    /// Returns `None` without changing anything when either side is missing.
    async fn assign_role(&self, user_id: i32, role_id: i32)
    -> Result<Option<UserDetails>, RepoError>;
}

/// Post repository. Deleting a post cascades to its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Insert a new post. Fails with `RepoError::Constraint` if the user does not exist.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_with_relations(&self, id: i32) -> Result<Option<PostDetails>, RepoError>;

    async fn find_page(&self, request: PageRequest) -> Result<Page<PostDetails>, RepoError>;

    /// All posts of one user, newest first.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<PostDetails>, RepoError>;

    async fn update(&self, id: i32, changes: PostChanges) -> Result<(), RepoError>;
}

/// Role repository.
#[async_trait]
pub trait RoleRepository: BaseRepository<Role, i32> {
    /// Insert a new role. Fails with `RepoError::Constraint` on a duplicate name.
    async fn create(&self, role: NewRole) -> Result<Role, RepoError>;

    /// All roles ordered by name.
    async fn find_all(&self) -> Result<Vec<Role>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Insert a new comment. Fails with `RepoError::Constraint` if the post does not exist.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments of one post, newest first.
    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;
}
