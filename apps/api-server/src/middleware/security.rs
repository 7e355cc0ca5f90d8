//! Security headers and CORS.

use actix_cors::Cors;
use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;

use crate::config::AppConfig;
use crate::observability::REQUEST_ID_HEADER;

/// Hardening headers added to every response.
pub fn security_headers(config: &AppConfig) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::X_XSS_PROTECTION, "0"))
        .add(("Cross-Origin-Opener-Policy", "same-origin"))
        .add(("Cross-Origin-Resource-Policy", "same-origin"))
        .add((header::X_DNS_PREFETCH_CONTROL, "off"));

    if config.environment.is_production() {
        headers.add((
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=15552000; includeSubDomains",
        ))
    } else {
        headers
    }
}

/// CORS policy: any origin unless `CORS_ALLOWED_ORIGINS` lists them.
pub fn cors(config: &AppConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([REQUEST_ID_HEADER])
        .max_age(3600);

    if config.cors_allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        config
            .cors_allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
