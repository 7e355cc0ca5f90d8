#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::database::entity::{comment, post, role, user, user_role};
    use crate::database::postgres_base::map_db_err;
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use quill_core::domain::{NewUser, Post};
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn user_model(id: i32, email: &str) -> user::Model {
        let now = chrono::Utc::now();
        user::Model {
            id,
            email: email.to_owned(),
            password: "x".to_owned(),
            first_name: "A".to_owned(),
            last_name: "B".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn post_model(id: i32, user_id: i32) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            user_id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            is_published: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_create_user_returns_persisted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model(1, "a@b.com")]])
            .into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));
        let user = repo
            .create(NewUser {
                email: "a@b.com".to_owned(),
                password: "x".to_owned(),
                first_name: "A".to_owned(),
                last_name: "B".to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_find_user_with_relations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model(1, "a@b.com")]])
            .append_query_results(vec![vec![post_model(10, 1), post_model(11, 1)]])
            .append_query_results(vec![vec![
                user_role::Model {
                    user_id: 1,
                    role_id: 3,
                },
                user_role::Model {
                    user_id: 1,
                    role_id: 4,
                },
            ]])
            .append_query_results(vec![vec![
                role::Model {
                    id: 3,
                    name: "zeta".to_owned(),
                    description: None,
                },
                role::Model {
                    id: 4,
                    name: "admin".to_owned(),
                    description: None,
                },
            ]])
            .into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));
        let details = repo.find_with_relations(1).await.unwrap().unwrap();

        assert_eq!(details.user.email, "a@b.com");
        assert_eq!(details.posts.len(), 2);
        let names: Vec<_> = details.roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["admin", "zeta"]);
    }

    #[tokio::test]
    async fn test_find_post_with_relations() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(10, 1)]])
            .append_query_results(vec![vec![user_model(1, "a@b.com")]])
            .append_query_results(vec![vec![comment::Model {
                id: 100,
                post_id: 10,
                content: "Nice".to_owned(),
                author_name: "C".to_owned(),
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));
        let details = repo.find_with_relations(10).await.unwrap().unwrap();

        assert_eq!(details.post.title, "Test Post");
        assert_eq!(details.user.unwrap().id, 1);
        assert_eq!(details.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_post_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));
        assert!(repo.find_with_relations(999_999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_was_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));
        assert!(BaseRepository::<Post, i32>::delete(&repo, 10).await.unwrap());
        assert!(!BaseRepository::<Post, i32>::delete(&repo, 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_assign_role_to_missing_user_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<user::Model>::new()])
            .append_query_results(vec![Vec::<role::Model>::new()])
            .into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));
        assert!(repo.assign_role(1, 3).await.unwrap().is_none());
    }

    #[test]
    fn test_map_db_err() {
        assert!(matches!(
            map_db_err(DbErr::RecordNotFound("users".to_owned())),
            RepoError::NotFound
        ));
        assert!(matches!(
            map_db_err(DbErr::Custom(
                "duplicate key value violates unique constraint".to_owned()
            )),
            RepoError::Constraint(_)
        ));
        assert!(matches!(
            map_db_err(DbErr::Custom("syntax error".to_owned())),
            RepoError::Query(_)
        ));
    }
}
