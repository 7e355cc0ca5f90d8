//! The uniform `{success, data|error}` response envelope.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            missing_fields: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            missing_fields: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            missing_fields: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn missing_fields(fields: Vec<String>) -> Self {
        Self {
            missing_fields: Some(fields),
            ..Self::error("Missing required fields")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::error("Post not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Post not found"})
        );
    }

    #[test]
    fn test_missing_fields_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::missing_fields(vec!["email".into()])).unwrap();
        assert_eq!(json["error"], "Missing required fields");
        assert_eq!(json["missingFields"], serde_json::json!(["email"]));
    }
}
