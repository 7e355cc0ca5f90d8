//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// `?page=&limit=` query string.
///
/// Values are kept as raw strings so that non-numeric input falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationQuery {
    pub fn page(&self) -> Option<i64> {
        parse_number(self.page.as_deref())
    }

    pub fn limit(&self) -> Option<i64> {
        parse_number(self.limit.as_deref())
    }
}

/// Reads an optionally signed run of leading digits, ignoring whatever
/// follows: `"10abc"` is 10 and `"2.5"` is 2.
fn parse_number(value: Option<&str>) -> Option<i64> {
    let value = value?.trim_start();
    let digits_start = usize::from(value.starts_with(['-', '+']));
    let digits_end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| digits_start + i);

    value[..digits_end].parse().ok()
}

/// Body of `POST /users/{userId}/roles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role_id: i32,
}

/// Body of `POST /posts/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub author_name: String,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_numeric_values_are_ignored() {
        let query = PaginationQuery {
            page: Some("abc".into()),
            limit: Some(" 25 ".into()),
        };
        assert_eq!(query.page(), None);
        assert_eq!(query.limit(), Some(25));
    }

    #[test]
    fn test_leading_digits_are_used() {
        let query = PaginationQuery {
            page: Some("2.5".into()),
            limit: Some("10abc".into()),
        };
        assert_eq!(query.page(), Some(2));
        assert_eq!(query.limit(), Some(10));

        let query = PaginationQuery {
            page: Some("-3".into()),
            limit: Some("+".into()),
        };
        assert_eq!(query.page(), Some(-3));
        assert_eq!(query.limit(), None);
    }
}
