//! Observability module - request ids and access-log spans.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware, RequestIdRootSpan};
