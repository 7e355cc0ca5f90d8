//! User handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::domain::{NewUser, UserChanges, UserDetails};
use quill_core::pagination::{PageMeta, PageRequest};
use quill_shared::ApiResponse;
use quill_shared::dto::{AssignRoleRequest, PaginationQuery};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validation::{ValidId, ValidatedJson};
use crate::state::AppState;

/// `data` of the paginated user list.
#[derive(Serialize)]
pub struct UserList {
    pub users: Vec<UserDetails>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// POST /api/v1/users
pub async fn create_user(
    state: web::Data<AppState>,
    body: ValidatedJson<NewUser>,
) -> AppResult<HttpResponse> {
    let user = state.users.create_user(body.into_inner()).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

/// GET /api/v1/users?page=&limit=
pub async fn get_all_users(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(query.page(), query.limit());
    let page = state.users.get_all_users(request).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserList {
        users: page.items,
        meta: page.meta,
    })))
}

/// GET /api/v1/users/{id}
pub async fn get_user_by_id(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    let user = state
        .users
        .get_user_by_id(id.get())
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    id: ValidId,
    body: web::Json<UserChanges>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .update_user(id.get(), body.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    if !state.users.delete_user(id.get()).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = id.get(), "User deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}

/// POST /api/v1/users/{id}/roles
pub async fn assign_role(
    state: web::Data<AppState>,
    id: ValidId,
    body: ValidatedJson<AssignRoleRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .assign_role_to_user(id.get(), body.role_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
