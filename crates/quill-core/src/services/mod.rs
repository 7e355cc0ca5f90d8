//! Services - the operations the HTTP layer calls into.
//!
//! Each operation validates its input, makes one repository call and turns
//! "nothing matched" into either `None` or `DomainError::NotFound`.

mod comment;
mod post;
mod role;
mod user;

pub use comment::CommentService;
pub use post::PostService;
pub use role::RoleService;
pub use user::UserService;
