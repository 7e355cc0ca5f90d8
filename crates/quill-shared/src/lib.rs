//! # Quill Shared
//!
//! Wire types shared by the server and its clients: the response envelope
//! and the request/query DTOs that carry no domain logic.

pub mod dto;
pub mod response;

pub use response::ApiResponse;
