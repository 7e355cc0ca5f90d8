//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::NewComment;
use quill_shared::ApiResponse;
use quill_shared::dto::CreateCommentRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validation::{ValidId, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/posts/{id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    post_id: ValidId,
    body: ValidatedJson<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let CreateCommentRequest {
        content,
        author_name,
    } = body.into_inner();

    let comment = state
        .comments
        .create_comment(NewComment {
            post_id: post_id.get(),
            content,
            author_name,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

/// GET /api/v1/posts/{id}/comments
pub async fn get_comments_by_post(
    state: web::Data<AppState>,
    post_id: ValidId,
) -> AppResult<HttpResponse> {
    let comments = state.comments.get_comments_by_post(post_id.get()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    if !state.comments.delete_comment(id.get()).await? {
        return Err(AppError::not_found("Comment"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted successfully")))
}
