//! In-memory store - used when PostgreSQL is not configured and in tests.
//!
//! Enforces the same invariants as the migrated schema: unique emails and
//! role names, required parents for posts and comments, and cascading deletes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quill_core::domain::{
    Comment, NewComment, NewPost, NewRole, NewUser, Post, PostChanges, PostDetails, Role, User,
    UserChanges, UserDetails,
};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest};
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, RoleRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
    roles: BTreeMap<i32, Role>,
    /// `(user_id, role_id)` association rows.
    user_roles: BTreeSet<(i32, i32)>,
    sequences: Sequences,
}

#[derive(Default)]
struct Sequences {
    user: i32,
    post: i32,
    comment: i32,
    role: i32,
}

fn next(sequence: &mut i32) -> i32 {
    *sequence += 1;
    *sequence
}

/// Newest first; ties broken by id so ordering is stable.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i32)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl Tables {
    fn user_details(&self, user: &User) -> UserDetails {
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|p| p.user_id == user.id)
            .cloned()
            .collect();
        newest_first(&mut posts, |p| (p.created_at, p.id));

        let mut roles: Vec<Role> = self
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == user.id)
            .filter_map(|(_, role_id)| self.roles.get(role_id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));

        UserDetails {
            user: user.clone(),
            posts,
            roles,
        }
    }

    fn post_details(&self, post: &Post) -> PostDetails {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|c| c.post_id == post.id)
            .cloned()
            .collect();
        newest_first(&mut comments, |c| (c.created_at, c.id));

        PostDetails {
            post: post.clone(),
            user: self.users.get(&post.user_id).cloned(),
            comments,
        }
    }

    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn remove_post(&mut self, id: i32) -> bool {
        if self.posts.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != id);
        true
    }

    fn remove_user(&mut self, id: i32) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let owned: Vec<i32> = self
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            self.remove_post(post_id);
        }
        self.user_roles.retain(|(user_id, _)| *user_id != id);
        true
    }
}

/// Shared tables behind an async RwLock.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();
    Page::new(items, total, request)
}

/// In-memory user repository.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        Ok(self.store.tables.write().await.remove_user(id))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.email_taken(&new_user.email, None) {
            return Err(RepoError::Constraint(format!(
                "email '{}' already exists",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: next(&mut tables.sequences.user),
            email: new_user.email,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_with_relations(&self, id: i32) -> Result<Option<UserDetails>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).map(|u| tables.user_details(u)))
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<UserDetails>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut users: Vec<&User> = tables.users.values().collect();
        newest_first(&mut users, |u| (u.created_at, u.id));

        let page = page_of(users, request);
        Ok(page.map(|u| tables.user_details(u)))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(());
        }
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(RepoError::Constraint(format!("email '{email}' already exists")));
            }
        }

        if let Some(user) = tables.users.get_mut(&id) {
            changes.apply(user);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn assign_role(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<Option<UserDetails>, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&user_id) || !tables.roles.contains_key(&role_id) {
            return Ok(None);
        }

        tables.user_roles.insert((user_id, role_id));
        Ok(tables.users.get(&user_id).map(|u| tables.user_details(u)))
    }
}

/// In-memory post repository.
#[derive(Clone)]
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        Ok(self.store.tables.write().await.remove_post(id))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&new_post.user_id) {
            return Err(RepoError::Constraint(format!(
                "user {} does not exist",
                new_post.user_id
            )));
        }

        let now = Utc::now();
        let post = Post {
            id: next(&mut tables.sequences.post),
            user_id: new_post.user_id,
            title: new_post.title,
            content: new_post.content,
            is_published: new_post.is_published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_with_relations(&self, id: i32) -> Result<Option<PostDetails>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).map(|p| tables.post_details(p)))
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<PostDetails>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<&Post> = tables.posts.values().collect();
        newest_first(&mut posts, |p| (p.created_at, p.id));

        let page = page_of(posts, request);
        Ok(page.map(|p| tables.post_details(p)))
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<PostDetails>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .collect();
        newest_first(&mut posts, |p| (p.created_at, p.id));

        Ok(posts.into_iter().map(|p| tables.post_details(p)).collect())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if let Some(post) = tables.posts.get_mut(&id) {
            changes.apply(post);
            post.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory role repository.
#[derive(Clone)]
pub struct InMemoryRoleRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryRoleRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Role, i32> for InMemoryRoleRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Role>, RepoError> {
        Ok(self.store.tables.read().await.roles.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.roles.remove(&id).is_none() {
            return Ok(false);
        }
        tables.user_roles.retain(|(_, role_id)| *role_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create(&self, new_role: NewRole) -> Result<Role, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.roles.values().any(|r| r.name == new_role.name) {
            return Err(RepoError::Constraint(format!(
                "role '{}' already exists",
                new_role.name
            )));
        }

        let role = Role {
            id: next(&mut tables.sequences.role),
            name: new_role.name,
            description: new_role.description,
        };
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn find_all(&self) -> Result<Vec<Role>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }
}

/// In-memory comment repository.
#[derive(Clone)]
pub struct InMemoryCommentRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Comment, i32> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.tables.read().await.comments.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        Ok(self.store.tables.write().await.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&new_comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                new_comment.post_id
            )));
        }

        let comment = Comment {
            id: next(&mut tables.sequences.comment),
            post_id: new_comment.post_id,
            content: new_comment.content,
            author_name: new_comment.author_name,
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        newest_first(&mut comments, |c| (c.created_at, c.id));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        users: InMemoryUserRepository,
        posts: InMemoryPostRepository,
        roles: InMemoryRoleRepository,
        comments: InMemoryCommentRepository,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        Fixture {
            users: InMemoryUserRepository::new(store.clone()),
            posts: InMemoryPostRepository::new(store.clone()),
            roles: InMemoryRoleRepository::new(store.clone()),
            comments: InMemoryCommentRepository::new(store),
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "x".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    fn new_post(user_id: i32, title: &str) -> NewPost {
        NewPost {
            user_id,
            title: title.to_string(),
            content: "Content".to_string(),
            is_published: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let f = fixture();
        f.users.create(new_user("a@b.com")).await.unwrap();

        let err = f.users.create(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_post_defaults_to_published_and_requires_user() {
        let f = fixture();
        let user = f.users.create(new_user("a@b.com")).await.unwrap();

        let post = f.posts.create(new_post(user.id, "Hello")).await.unwrap();
        assert!(post.is_published);

        let err = f.posts.create(new_post(999, "Orphan")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_posts_and_comments() {
        let f = fixture();
        let user = f.users.create(new_user("a@b.com")).await.unwrap();
        let post = f.posts.create(new_post(user.id, "Hello")).await.unwrap();
        let comment = f
            .comments
            .create(NewComment {
                post_id: post.id,
                content: "Nice".to_string(),
                author_name: "C".to_string(),
            })
            .await
            .unwrap();

        assert!(f.users.delete(user.id).await.unwrap());
        assert!(f.posts.find_by_id(post.id).await.unwrap().is_none());
        assert!(f.comments.find_by_id(comment.id).await.unwrap().is_none());
        assert!(!f.users.delete(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_assign_role_is_idempotent() {
        let f = fixture();
        let user = f.users.create(new_user("a@b.com")).await.unwrap();
        let role = f
            .roles
            .create(NewRole {
                name: "admin".to_string(),
                description: None,
            })
            .await
            .unwrap();

        f.users.assign_role(user.id, role.id).await.unwrap();
        let details = f.users.assign_role(user.id, role.id).await.unwrap().unwrap();
        assert_eq!(details.roles, vec![role]);
    }

    #[tokio::test]
    async fn test_assign_missing_role_changes_nothing() {
        let f = fixture();
        let user = f.users.create(new_user("a@b.com")).await.unwrap();

        assert!(f.users.assign_role(user.id, 42).await.unwrap().is_none());
        assert!(f.users.assign_role(42, 1).await.unwrap().is_none());

        let details = f.users.find_with_relations(user.id).await.unwrap().unwrap();
        assert!(details.roles.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_role_keeps_users() {
        let f = fixture();
        let user = f.users.create(new_user("a@b.com")).await.unwrap();
        let role = f
            .roles
            .create(NewRole {
                name: "editor".to_string(),
                description: Some("Can edit".to_string()),
            })
            .await
            .unwrap();
        f.users.assign_role(user.id, role.id).await.unwrap();

        assert!(f.roles.delete(role.id).await.unwrap());
        let details = f.users.find_with_relations(user.id).await.unwrap().unwrap();
        assert!(details.roles.is_empty());
    }

    #[tokio::test]
    async fn test_find_page_is_newest_first_and_bounded() {
        let f = fixture();
        for i in 0..5 {
            f.users
                .create(new_user(&format!("user{i}@example.com")))
                .await
                .unwrap();
        }

        let page = f
            .users
            .find_page(PageRequest::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.items[0].user.email, "user2@example.com");
    }

    #[tokio::test]
    async fn test_update_patches_only_supplied_fields() {
        let f = fixture();
        let user = f.users.create(new_user("a@b.com")).await.unwrap();

        f.users
            .update(
                user.id,
                UserChanges {
                    last_name: Some("Lovelace".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = f.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.last_name, "Lovelace");
        assert_eq!(updated.first_name, "A");
        assert_eq!(updated.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_update_of_missing_user_ignores_taken_email() {
        let f = fixture();
        f.users.create(new_user("taken@b.com")).await.unwrap();

        f.users
            .update(
                999,
                UserChanges {
                    email: Some("taken@b.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(f.users.find_by_id(999).await.unwrap().is_none());
    }
}
