//! # Quill Core
//!
//! The domain layer of the Quill API.
//! Entities, repository ports and the services the HTTP layer calls into.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, PageMeta, PageRequest};
