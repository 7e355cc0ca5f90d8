use std::sync::Arc;

use crate::domain::{NewUser, User, UserChanges, UserDetails};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::UserRepository;

/// User operations.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        new_user.validate()?;
        Ok(self.users.create(new_user).await?)
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<UserDetails>, DomainError> {
        Ok(self.users.find_with_relations(id).await?)
    }

    pub async fn get_all_users(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserDetails>, DomainError> {
        Ok(self.users.find_page(request).await?)
    }

    /// Patches the user and returns the fresh record, or `None` if the id is unknown.
    pub async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<UserDetails>, DomainError> {
        changes.validate()?;
        self.users.update(id, changes).await?;
        self.get_user_by_id(id).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.users.delete(id).await?)
    }

    pub async fn assign_role_to_user(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<UserDetails, DomainError> {
        self.users
            .assign_role(user_id, role_id)
            .await?
            .ok_or_else(|| DomainError::Validation("User or Role not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::error::RepoError;
    use crate::ports::BaseRepository;

    /// Repository with no users that records every write it receives.
    #[derive(Default)]
    struct EmptyUsers {
        writes: Mutex<Vec<&'static str>>,
    }

    impl EmptyUsers {
        fn record(&self, op: &'static str) {
            self.writes.lock().unwrap().push(op);
        }
    }

    #[async_trait]
    impl BaseRepository<User, i32> for EmptyUsers {
        async fn find_by_id(&self, _id: i32) -> Result<Option<User>, RepoError> {
            Ok(None)
        }

        async fn delete(&self, _id: i32) -> Result<bool, RepoError> {
            self.record("delete");
            Ok(false)
        }
    }

    #[async_trait]
    impl UserRepository for EmptyUsers {
        async fn create(&self, user: NewUser) -> Result<User, RepoError> {
            self.record("create");
            let now = Utc::now();
            Ok(User {
                id: 1,
                email: user.email,
                password: user.password,
                first_name: user.first_name,
                last_name: user.last_name,
                created_at: now,
                updated_at: now,
            })
        }

        async fn find_with_relations(&self, _id: i32) -> Result<Option<UserDetails>, RepoError> {
            Ok(None)
        }

        async fn find_page(&self, request: PageRequest) -> Result<Page<UserDetails>, RepoError> {
            Ok(Page::new(Vec::new(), 0, request))
        }

        async fn update(&self, _id: i32, _changes: UserChanges) -> Result<(), RepoError> {
            self.record("update");
            Ok(())
        }

        async fn assign_role(
            &self,
            _user_id: i32,
            _role_id: i32,
        ) -> Result<Option<UserDetails>, RepoError> {
            Ok(None)
        }
    }

    fn service() -> (UserService, Arc<EmptyUsers>) {
        let repo = Arc::new(EmptyUsers::default());
        (UserService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_the_repository() {
        let (users, repo) = service();
        let err = users
            .create_user(NewUser {
                email: "not-an-email".into(),
                password: "x".into(),
                first_name: "A".into(),
                last_name: "B".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repo.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_of_missing_user_returns_none() {
        let (users, repo) = service();
        let updated = users
            .update_user(
                9,
                UserChanges {
                    first_name: Some("Z".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.is_none());
        assert_eq!(*repo.writes.lock().unwrap(), vec!["update"]);
    }

    #[tokio::test]
    async fn test_assign_role_reports_user_or_role_not_found() {
        let (users, _) = service();
        let err = users.assign_role_to_user(1, 2).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "User or Role not found");
    }

    #[tokio::test]
    async fn test_empty_page_has_zero_pages() {
        let (users, _) = service();
        let page = users.get_all_users(PageRequest::default()).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_pages, 0);
    }
}
