//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    LoaderTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use quill_core::domain::{
    Comment, NewComment, NewPost, NewRole, NewUser, Post, PostChanges, PostDetails, Role, User,
    UserChanges, UserDetails,
};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest};
use quill_core::ports::{CommentRepository, PostRepository, RoleRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::role::{self, Entity as RoleEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_role::{self, Entity as UserRoleEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL role repository.
pub type PostgresRoleRepository = PostgresBaseRepository<RoleEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Load posts (newest first) and roles for a batch of users, preserving order.
async fn attach_user_relations<C>(
    db: &C,
    users: Vec<user::Model>,
) -> Result<Vec<UserDetails>, DbErr>
where
    C: ConnectionTrait,
{
    let posts = users
        .load_many(
            PostEntity::find()
                .order_by_desc(post::Column::CreatedAt)
                .order_by_desc(post::Column::Id),
            db,
        )
        .await?;
    // Loader output follows join-row order, so roles are sorted afterwards.
    let roles = users
        .load_many_to_many(RoleEntity::find(), UserRoleEntity, db)
        .await?;

    Ok(users
        .into_iter()
        .zip(posts)
        .zip(roles)
        .map(|((user, posts), roles)| UserDetails {
            user: user.into(),
            posts: posts.into_iter().map(Into::into).collect(),
            roles: sorted_by_name(roles),
        })
        .collect())
}

fn sorted_by_name(roles: Vec<role::Model>) -> Vec<Role> {
    let mut roles: Vec<Role> = roles.into_iter().map(Into::into).collect();
    roles.sort_by(|a, b| a.name.cmp(&b.name));
    roles
}

/// Load the author and comments (newest first) for a batch of posts.
async fn attach_post_relations<C>(
    db: &C,
    posts: Vec<post::Model>,
) -> Result<Vec<PostDetails>, DbErr>
where
    C: ConnectionTrait,
{
    let users = posts.load_one(UserEntity, db).await?;
    let comments = posts
        .load_many(
            CommentEntity::find()
                .order_by_desc(comment::Column::CreatedAt)
                .order_by_desc(comment::Column::Id),
            db,
        )
        .await?;

    Ok(posts
        .into_iter()
        .zip(users)
        .zip(comments)
        .map(|((post, user), comments)| PostDetails {
            post: post.into(),
            user: user.map(Into::into),
            comments: comments.into_iter().map(Into::into).collect(),
        })
        .collect())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: NotSet,
            email: Set(new_user.email),
            password: Set(new_user.password),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.conn())
        .await
        .map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "User created");
        Ok(model.into())
    }

    async fn find_with_relations(&self, id: i32) -> Result<Option<UserDetails>, RepoError> {
        let Some(model) = UserEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut details = attach_user_relations(self.conn(), vec![model])
            .await
            .map_err(map_db_err)?;
        Ok(details.pop())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<UserDetails>, RepoError> {
        let paginator = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .paginate(self.conn(), request.limit());

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let users = paginator
            .fetch_page(request.page() - 1)
            .await
            .map_err(map_db_err)?;
        let items = attach_user_relations(self.conn(), users)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(items, total, request))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<(), RepoError> {
        let mut active = user::ActiveModel::new();
        active.updated_at = Set(Utc::now().into());
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password) = changes.password {
            active.password = Set(password);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }

        let result = UserEntity::update_many()
            .set(active)
            .filter(user::Column::Id.eq(id))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        tracing::debug!(user_id = id, rows = result.rows_affected, "User updated");
        Ok(())
    }

    async fn assign_role(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<Option<UserDetails>, RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        // Row lock serializes concurrent assignments to the same user.
        let user = UserEntity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        let role = RoleEntity::find_by_id(role_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?;

        let (Some(user), Some(_)) = (user, role) else {
            tracing::debug!(user_id, role_id, "Role assignment skipped: user or role missing");
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(None);
        };

        UserRoleEntity::insert(user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .on_conflict(
            OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(map_db_err)?;

        let mut details = attach_user_relations(&txn, vec![user])
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(user_id, role_id, "Role assigned to user");
        Ok(details.pop())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let model = post::ActiveModel {
            id: NotSet,
            user_id: Set(new_post.user_id),
            title: Set(new_post.title),
            content: Set(new_post.content),
            is_published: Set(new_post.is_published.unwrap_or(true)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.conn())
        .await
        .map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, user_id = model.user_id, "Post created");
        Ok(model.into())
    }

    async fn find_with_relations(&self, id: i32) -> Result<Option<PostDetails>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut details = attach_post_relations(self.conn(), vec![model])
            .await
            .map_err(map_db_err)?;
        Ok(details.pop())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<PostDetails>, RepoError> {
        let paginator = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(self.conn(), request.limit());

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let posts = paginator
            .fetch_page(request.page() - 1)
            .await
            .map_err(map_db_err)?;
        let items = attach_post_relations(self.conn(), posts)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(items, total, request))
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<PostDetails>, RepoError> {
        let posts = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        attach_post_relations(self.conn(), posts)
            .await
            .map_err(map_db_err)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<(), RepoError> {
        let mut active = post::ActiveModel::new();
        active.updated_at = Set(Utc::now().into());
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(is_published) = changes.is_published {
            active.is_published = Set(is_published);
        }

        let result = PostEntity::update_many()
            .set(active)
            .filter(post::Column::Id.eq(id))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        tracing::debug!(post_id = id, rows = result.rows_affected, "Post updated");
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create(&self, new_role: NewRole) -> Result<Role, RepoError> {
        let model = role::ActiveModel {
            id: NotSet,
            name: Set(new_role.name),
            description: Set(new_role.description),
        }
        .insert(self.conn())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_all(&self) -> Result<Vec<Role>, RepoError> {
        let roles = RoleEntity::find()
            .order_by_asc(role::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(roles.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new_comment.post_id),
            content: Set(new_comment.content),
            author_name: Set(new_comment.author_name),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.conn())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let comments = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(comments.into_iter().map(Into::into).collect())
    }
}
