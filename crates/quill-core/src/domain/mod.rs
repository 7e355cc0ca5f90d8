//! Domain entities - the core business objects.

mod comment;
mod post;
mod role;
mod user;

pub use comment::{Comment, NewComment};
pub use post::{NewPost, Post, PostChanges, PostDetails};
pub use role::{NewRole, Role};
pub use user::{NewUser, User, UserChanges, UserDetails};

use crate::error::DomainError;

/// Rejects a value that is empty once surrounding whitespace is removed.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
