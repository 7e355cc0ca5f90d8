//! Request validation extractors.
//!
//! `ValidatedJson<T>` rejects bodies lacking any of `T::REQUIRED` before the
//! body is deserialized, and `ValidId` rejects path ids that are not positive
//! integers. Both fail with the standard 400 envelope.

use std::future::{Future, Ready, ready};
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use serde::de::DeserializeOwned;
use serde_json::Value;

use quill_core::domain::{NewPost, NewRole, NewUser};
use quill_shared::dto::{AssignRoleRequest, CreateCommentRequest};

use super::error::AppError;

/// Body fields that must be present, non-null and not blank.
pub trait RequiredFields {
    const REQUIRED: &'static [&'static str];
}

impl RequiredFields for NewUser {
    const REQUIRED: &'static [&'static str] = &["email", "password", "firstName", "lastName"];
}

impl RequiredFields for NewPost {
    const REQUIRED: &'static [&'static str] = &["userId", "title", "content"];
}

impl RequiredFields for NewRole {
    const REQUIRED: &'static [&'static str] = &["name"];
}

impl RequiredFields for AssignRoleRequest {
    const REQUIRED: &'static [&'static str] = &["roleId"];
}

impl RequiredFields for CreateCommentRequest {
    const REQUIRED: &'static [&'static str] = &["content", "authorName"];
}

/// Names from `required` that are absent, null or blank in `body`.
pub fn missing_fields(body: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| match body.get(**field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .map(|field| field.to_string())
        .collect()
}

/// JSON body whose required fields were checked before deserialization.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: RequiredFields + DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let body = body.await?.into_inner();
            Self::check(body).map_err(actix_web::Error::from)
        })
    }
}

impl<T> ValidatedJson<T>
where
    T: RequiredFields + DeserializeOwned,
{
    fn check(body: Value) -> Result<Self, AppError> {
        let missing = missing_fields(&body, T::REQUIRED);
        if !missing.is_empty() {
            tracing::debug!(?missing, "Rejected request with missing fields");
            return Err(AppError::MissingFields(missing));
        }

        serde_json::from_value(body)
            .map(ValidatedJson)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
    }
}

/// Positive integer taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidId(pub i32);

impl ValidId {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<i32>().ok().filter(|id| *id > 0).map(ValidId)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromRequest for ValidId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .match_info()
            .get("id")
            .and_then(ValidId::parse)
            .ok_or_else(|| actix_web::Error::from(AppError::InvalidId));

        ready(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_detects_absent_null_and_blank() {
        let body = json!({"email": "a@b.com", "password": null, "firstName": "   "});
        assert_eq!(
            missing_fields(&body, NewUser::REQUIRED),
            vec!["password", "firstName", "lastName"]
        );
    }

    #[test]
    fn test_non_string_values_count_as_present() {
        let body = json!({"userId": 1, "title": "T", "content": "C"});
        assert!(missing_fields(&body, NewPost::REQUIRED).is_empty());

        let body = json!({"roleId": 0});
        assert!(missing_fields(&body, AssignRoleRequest::REQUIRED).is_empty());
    }

    #[test]
    fn test_non_object_body_misses_everything() {
        assert_eq!(missing_fields(&json!([1, 2]), NewRole::REQUIRED), vec!["name"]);
    }

    #[test]
    fn test_valid_id() {
        assert_eq!(ValidId::parse("42"), Some(ValidId(42)));
        assert_eq!(ValidId::parse("0"), None);
        assert_eq!(ValidId::parse("-1"), None);
        assert_eq!(ValidId::parse("abc"), None);
        assert_eq!(ValidId::parse("99999999999"), None);
    }
}
