//! Post handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::domain::{NewPost, PostChanges, PostDetails};
use quill_core::pagination::{PageMeta, PageRequest};
use quill_shared::ApiResponse;
use quill_shared::dto::PaginationQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validation::{ValidId, ValidatedJson};
use crate::state::AppState;

/// `data` of the paginated post list.
#[derive(Serialize)]
pub struct PostList {
    pub posts: Vec<PostDetails>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: ValidatedJson<NewPost>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create_post(body.into_inner()).await?;
    tracing::info!(post_id = post.id, user_id = post.user_id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/v1/posts?page=&limit=
pub async fn get_all_posts(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(query.page(), query.limit());
    let page = state.posts.get_all_posts(request).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostList {
        posts: page.items,
        meta: page.meta,
    })))
}

/// GET /api/v1/posts/{id}
pub async fn get_post_by_id(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get_post_by_id(id.get())
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/v1/posts/user/{id}
pub async fn get_posts_by_user(
    state: web::Data<AppState>,
    user_id: ValidId,
) -> AppResult<HttpResponse> {
    let posts = state.posts.get_posts_by_user(user_id.get()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    id: ValidId,
    body: web::Json<PostChanges>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update_post(id.get(), body.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(state: web::Data<AppState>, id: ValidId) -> AppResult<HttpResponse> {
    if !state.posts.delete_post(id.get()).await? {
        return Err(AppError::not_found("Post"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}
