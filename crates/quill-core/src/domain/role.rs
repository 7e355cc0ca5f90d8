use serde::{Deserialize, Serialize};

use super::require_non_blank;
use crate::error::DomainError;

/// Role entity - a named permission set assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields required to create a role.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewRole {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("name", &self.name)
    }
}
