use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Post, Role, require_non_blank};
use crate::error::DomainError;

/// User entity - represents a user in the system.
///
/// The password is persisted exactly as supplied and is never serialized back
/// to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with its posts (newest first) and roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
    pub roles: Vec<Role>,
}

/// Fields required to create a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_email(&self.email)?;
        require_non_blank("password", &self.password)
    }
}

/// Partial patch for a user; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            require_non_blank("password", password)?;
        }
        Ok(())
    }

    /// Applies the patch to an in-memory copy of the user.
    pub fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
    }
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    require_non_blank("email", email)?;
    if !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "x".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(new_user("a@b.com").validate().is_ok());
        assert!(new_user("not-an-email").validate().is_err());
        assert!(new_user("   ").validate().is_err());
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let now = Utc::now();
        let mut user = User {
            id: 1,
            email: "a@b.com".to_string(),
            password: "x".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            created_at: now,
            updated_at: now,
        };

        UserChanges {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "B");
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn test_password_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "A");
    }
}
