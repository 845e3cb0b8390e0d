//! Application error type and its HTTP mapping.
//!
//! Every handler and service returns [`AppError`]. It carries the HTTP status
//! to answer with, the underlying [`anyhow::Error`], and for validation
//! failures a per-field message map that is echoed back to the client.
//!
//! # Response body
//!
//! ```json
//! { "error": "Validation failed", "fields": { "phone_number": ["..."] } }
//! ```

use std::collections::BTreeMap;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Field name to list of messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// JSON error body, used for API documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    /// 400 with the offending fields echoed back.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        collect_field_errors(errors, None, &mut fields);

        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!("Validation failed"),
            fields: Some(fields),
        }
    }

    /// 400 for a single field, e.g. a unique constraint hit in the store.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.clone()]);

        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(message),
            fields: Some(fields),
        }
    }
}

/// Flattens nested validator output into dotted paths (`medical_notes[0].code`).
fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = out.entry(path.clone()).or_default();
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_field_errors(inner, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_field_errors(inner, Some(&item_path), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = match self.fields {
            Some(fields) => json!({
                "error": self.error.to_string(),
                "fields": fields,
            }),
            None => json!({
                "error": self.error.to_string()
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Note {
        #[validate(length(min = 1, message = "Code must not be empty"))]
        code: String,
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        name: String,
        #[validate(nested)]
        notes: Vec<Note>,
    }

    #[test]
    fn test_status_constructors() {
        assert_eq!(
            AppError::not_found(anyhow::anyhow!("x")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("x")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthorized("x".to_string()).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("x".to_string()).status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_flattens_nested_fields() {
        let payload = Payload {
            name: String::new(),
            notes: vec![
                Note {
                    code: "ok".to_string(),
                },
                Note {
                    code: String::new(),
                },
            ],
        };

        let errors = payload.validate().unwrap_err();
        let err = AppError::validation(&errors);
        let fields = err.fields.unwrap();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(fields.contains_key("name"));
        assert_eq!(
            fields.get("notes[1].code"),
            Some(&vec!["Code must not be empty".to_string()])
        );
    }

    #[test]
    fn test_field_error() {
        let err = AppError::field("username", "Username already exists");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "Username already exists");
        assert!(err.fields.unwrap().contains_key("username"));
    }
}
