//! SeaORM entities mirroring the migrated schema.

pub mod comment;
pub mod post;
pub mod role;
pub mod user;
pub mod user_role;
