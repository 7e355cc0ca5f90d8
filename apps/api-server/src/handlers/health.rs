//! Health check endpoint.

use actix_web::{HttpResponse, web};
use quill_shared::dto::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - returns server and database status.
///
/// GET /health, GET /api/v1/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.database_status().await.to_string(),
    };

    HttpResponse::Ok().json(response)
}
