//! Role handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::NewRole;
use quill_shared::ApiResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validation::{ValidId, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/roles
pub async fn create_role(
    state: web::Data<AppState>,
    body: ValidatedJson<NewRole>,
) -> AppResult<HttpResponse> {
    let role = state.roles.create_role(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(role)))
}

/// GET /api/v1/roles
pub async fn get_all_roles(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let roles = state.roles.get_all_roles().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(roles)))
}

/// GET /api/v1/roles/{id}
pub async fn get_role_by_id(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    let role = state
        .roles
        .get_role_by_id(id.get())
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(role)))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete_role(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    if !state.roles.delete_role(id.get()).await? {
        return Err(AppError::not_found("Role"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Role deleted successfully")))
}
