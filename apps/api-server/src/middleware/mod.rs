//! Middleware modules.

pub mod error;
pub mod security;
pub mod validation;
