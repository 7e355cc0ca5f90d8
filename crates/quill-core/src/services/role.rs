use std::sync::Arc;

use crate::domain::{NewRole, Role};
use crate::error::DomainError;
use crate::ports::RoleRepository;

/// Role operations.
#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    pub async fn create_role(&self, new_role: NewRole) -> Result<Role, DomainError> {
        new_role.validate()?;
        Ok(self.roles.create(new_role).await?)
    }

    pub async fn get_role_by_id(&self, id: i32) -> Result<Option<Role>, DomainError> {
        Ok(self.roles.find_by_id(id).await?)
    }

    pub async fn get_all_roles(&self) -> Result<Vec<Role>, DomainError> {
        Ok(self.roles.find_all().await?)
    }

    /// Removes the role and its user assignments; users are kept.
    pub async fn delete_role(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.roles.delete(id).await?)
    }
}
