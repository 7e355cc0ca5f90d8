//! Error handling - every failure leaves the server as a JSON envelope.

use actix_web::body::EitherBody;
use actix_web::dev::ServiceResponse;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use quill_core::error::{DomainError, RepoError};
use quill_shared::ApiResponse;
use thiserror::Error;

use crate::config::AppConfig;

/// Application-level error type rendered as a `{success: false, ...}` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid ID parameter")]
    InvalidId,

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity} not found"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MissingFields(_) | AppError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::MissingFields(fields) => ApiResponse::missing_fields(fields.clone()),
            other => ApiResponse::error(other.to_string()),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(entity) => AppError::not_found(entity),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Repository(repo) => {
                match &repo {
                    RepoError::Connection(_) | RepoError::Query(_) => {
                        tracing::error!(error = %repo, "Repository failure");
                    }
                    RepoError::NotFound | RepoError::Constraint(_) => {
                        tracing::debug!(error = %repo, "Repository rejected request");
                    }
                }
                AppError::BadRequest(repo.to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Rewrites every 500 into the standard envelope.
///
/// The underlying error text is only exposed in development.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler_server(render_internal_error)
}

fn render_internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let detail = res
        .response()
        .error()
        .map(|err| err.to_string())
        .unwrap_or_else(|| "Internal Server Error".to_string());

    tracing::error!(
        path = %res.request().path(),
        status = res.status().as_u16(),
        error = %detail,
        "Unhandled server error"
    );

    let expose_detail = res
        .request()
        .app_data::<web::Data<AppConfig>>()
        .is_some_and(|config| config.environment.is_development());
    let message = if expose_detail {
        detail
    } else {
        "Something went wrong".to_string()
    };

    let (req, _) = res.into_parts();
    let response = HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
        .json(ApiResponse::error("Internal Server Error").with_message(message));
    let res: ServiceResponse<EitherBody<B>> =
        ServiceResponse::new(req, response).map_into_right_body();

    Ok(ErrorHandlerResponse::Response(res))
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("Route not found: {}", req.path())))
}

/// Malformed or oversized JSON bodies.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            AppError::PayloadTooLarge.into()
        }
        other => AppError::BadRequest(format!("Invalid JSON body: {other}")).into(),
    }
}

/// Query strings that cannot be decoded.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use actix_web::App;
    use actix_web::body::to_bytes;
    use actix_web::test::{TestRequest, call_service, init_service, read_body_json};

    #[test]
    fn test_domain_error_mapping() {
        let err: AppError = DomainError::NotFound("Post").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Post not found");

        let err: AppError = DomainError::Validation("title must not be empty".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: AppError = DomainError::Repository(RepoError::Constraint("dup".into())).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_fields_body() {
        let res = AppError::MissingFields(vec!["email".into(), "password".into()]).error_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(res.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing required fields");
        assert_eq!(json["missingFields"], serde_json::json!(["email", "password"]));
    }

    async fn server_error_body(environment: Environment) -> serde_json::Value {
        let app = init_service(
            App::new()
                .app_data(web::Data::new(AppConfig {
                    environment,
                    ..AppConfig::default()
                }))
                .wrap(error_handlers())
                .route(
                    "/fail",
                    web::get().to(|| async {
                        Err::<HttpResponse, _>(actix_web::error::ErrorInternalServerError(
                            "db exploded",
                        ))
                    }),
                ),
        )
        .await;

        let res = call_service(&app, TestRequest::get().uri("/fail").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        read_body_json(res).await
    }

    #[actix_web::test]
    async fn test_server_error_shows_detail_in_development() {
        let body = server_error_body(Environment::Development).await;
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": "Internal Server Error",
                "message": "db exploded"
            })
        );
    }

    #[actix_web::test]
    async fn test_server_error_hides_detail_in_production() {
        let body = server_error_body(Environment::Production).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "Something went wrong");
    }
}
