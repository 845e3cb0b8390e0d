use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use kinder_core::AppError;

/// JSON body extractor that runs `validator` rules before the handler sees it.
///
/// Every body problem is a 400: malformed JSON, missing or mistyped fields,
/// a missing content type, or a failed validation rule (with a field map).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}

/// Plain JSON body extractor with the same 400 mapping, for bodies without rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        Ok(JsonBody(value))
    }
}

/// Path parameters with the JSON error body on a malformed segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                AppError::bad_request(anyhow!("Invalid path parameter: {}", e.body_text()))
            })?;
        Ok(PathParam(value))
    }
}

/// Query string extractor with the same 400 mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::bad_request(anyhow!("Invalid query parameters: {}", e.body_text()))
            })?;
        Ok(QueryParams(value))
    }
}

/// Dotted path of a missing field, e.g. `employee.phone_number`. The
/// rejection text carries the enclosing path just before "missing field".
fn missing_field_path(error_msg: &str) -> Option<String> {
    let (head, tail) = error_msg.split_once("missing field `")?;
    let field = tail.split('`').next()?;
    let parent = head
        .trim_end()
        .trim_end_matches(':')
        .rsplit(": ")
        .next()
        .filter(|p| !p.is_empty() && !p.contains(' '));

    Some(match parent {
        Some(parent) => format!("{}.{}", parent, field),
        None => field.to_string(),
    })
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let error_msg = rejection.body_text();

    if let Some(field) = missing_field_path(&error_msg) {
        return AppError::field(&field, format!("{} is required", field));
    }

    if error_msg.contains("unknown variant") {
        return AppError::bad_request(anyhow!("Invalid choice: {}", error_msg));
    }

    if error_msg.contains("invalid type") || error_msg.contains("invalid value") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let req = request(Some("application/json"), r#"{"name":"Sunflowers"}"#);
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(payload.name, "Sunflowers");
    }

    #[tokio::test]
    async fn test_rule_failure_is_400_with_fields() {
        let req = request(Some("application/json"), r#"{"name":""}"#);
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.fields.unwrap().contains_key("name"));
    }

    #[tokio::test]
    async fn test_missing_field_names_the_field() {
        let req = request(Some("application/json"), "{}");
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.fields.unwrap().contains_key("name"));
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Outer {
        #[validate(nested)]
        inner: Payload,
    }

    #[tokio::test]
    async fn test_missing_nested_field_uses_dotted_path() {
        let req = request(Some("application/json"), r#"{"inner":{}}"#);
        let err = ValidatedJson::<Outer>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let fields = err.fields.unwrap();
        assert!(fields.contains_key("inner.name"), "{:?}", fields);
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_missing_field_path() {
        assert_eq!(
            missing_field_path(
                "Failed to deserialize the JSON body into the target type: missing field `password` at line 1 column 20"
            ),
            Some("password".to_string())
        );
        assert_eq!(
            missing_field_path(
                "Failed to deserialize the JSON body into the target type: medical_notes[1]: missing field `code` at line 1 column 90"
            ),
            Some("medical_notes[1].code".to_string())
        );
        assert_eq!(missing_field_path("expected value at line 1 column 1"), None);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_400() {
        let req = request(None, r#"{"name":"x"}"#);
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let req = request(Some("application/json"), "{not json");
        let err = JsonBody::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
