//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod roles;
mod users;


use actix_web::web;

use crate::middleware::error::{json_error, query_error, route_not_found};

/// Largest accepted JSON body.
const JSON_LIMIT: usize = 10 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create_user))
                    .route("", web::get().to(users::get_all_users))
                    .route("/{id}", web::get().to(users::get_user_by_id))
                    .route("/{id}", web::put().to(users::update_user))
                    .route("/{id}", web::delete().to(users::delete_user))
                    .route("/{id}/roles", web::post().to(users::assign_role)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("", web::get().to(posts::get_all_posts))
                    .route("/user/{id}", web::get().to(posts::get_posts_by_user))
                    .route("/{id}", web::get().to(posts::get_post_by_id))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/comments", web::post().to(comments::create_comment))
                    .route("/{id}/comments", web::get().to(comments::get_comments_by_post)),
            )
            .service(
                web::scope("/comments")
                    .route("/{id}", web::delete().to(comments::delete_comment)),
            )
            .service(
                web::scope("/roles")
                    .route("", web::post().to(roles::create_role))
                    .route("", web::get().to(roles::get_all_roles))
                    .route("/{id}", web::get().to(roles::get_role_by_id))
                    .route("/{id}", web::delete().to(roles::delete_role)),
            ),
    )
    .default_service(web::to(route_not_found));
}
