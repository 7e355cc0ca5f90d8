//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use quill_core::services::{CommentService, PostService, RoleService, UserService};
use quill_infra::database::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryRoleRepository, InMemoryStore,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabasePool, PostgresCommentRepository, PostgresPostRepository, PostgresRoleRepository,
    PostgresUserRepository,
};

use crate::config::{AppConfig, StorageBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub roles: RoleService,
    pub comments: CommentService,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabasePool>>,
}

impl AppState {
    /// Build the state for the configured storage backend.
    ///
    /// For PostgreSQL this creates the database if needed, opens the pool and
    /// applies pending migrations before returning.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        match config.storage {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres => Self::postgres(config).await,
            #[cfg(not(feature = "postgres"))]
            StorageBackend::Postgres => Err(io::Error::other(
                "PostgreSQL storage requested but the `postgres` feature is disabled",
            )),
        }
    }

    /// State backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());

        Self {
            users: UserService::new(Arc::new(InMemoryUserRepository::new(store.clone()))),
            posts: PostService::new(Arc::new(InMemoryPostRepository::new(store.clone()))),
            roles: RoleService::new(Arc::new(InMemoryRoleRepository::new(store.clone()))),
            comments: CommentService::new(Arc::new(InMemoryCommentRepository::new(store))),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &AppConfig) -> io::Result<Self> {
        use migration::{Migrator, MigratorTrait};

        let db_config = &config.database;

        if DatabasePool::ensure_database_exists(db_config)
            .await
            .map_err(io::Error::other)?
        {
            tracing::info!(database = db_config.database_name(), "Database created");
        }

        let pool = DatabasePool::init(db_config)
            .await
            .map_err(io::Error::other)?;

        Migrator::up(pool.connection().as_ref(), None)
            .await
            .map_err(io::Error::other)?;
        tracing::info!("Migrations applied");

        let conn = pool.connection();
        Ok(Self {
            users: UserService::new(Arc::new(PostgresUserRepository::new(conn.clone()))),
            posts: PostService::new(Arc::new(PostgresPostRepository::new(conn.clone()))),
            roles: RoleService::new(Arc::new(PostgresRoleRepository::new(conn.clone()))),
            comments: CommentService::new(Arc::new(PostgresCommentRepository::new(conn))),
            db: Some(Arc::new(pool)),
        })
    }

    /// Database status reported by the health endpoint.
    pub async fn database_status(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        let status = match &self.db {
            Some(pool) => {
                if pool.ping().await {
                    "connected"
                } else {
                    "disconnected"
                }
            }
            None => "in-memory",
        };
        #[cfg(not(feature = "postgres"))]
        let status = "in-memory";

        status
    }
}
