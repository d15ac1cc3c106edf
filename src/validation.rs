// Validation utilities module
// Request body extraction plus custom validation functions

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::ApiError;

/// JSON body extractor that runs `validator` rules after deserializing
///
/// Malformed JSON is rejected as `BadRequest`; rule failures as
/// `ValidationFailed` carrying one message per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `Path` whose rejection renders as an `ApiError` body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// `Query` whose rejection renders as an `ApiError` body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// Rejects empty or whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Must not be blank.".into());
        Err(error)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(custom = "validate_not_blank")]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Ana").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("  \t").is_err());
    }

    #[tokio::test]
    async fn test_valid_body_extracted() {
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"Ana"}"#), &())
            .await
            .unwrap();

        assert_eq!(payload.name, "Ana");
    }

    #[tokio::test]
    async fn test_rule_failure_is_validation_error() {
        let err = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":" "}"#), &())
            .await
            .unwrap_err();

        match &err {
            ApiError::ValidationFailed(fields) => {
                assert_eq!(fields.get("name").map(String::as_str), Some("Must not be blank."));
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        owner: Option<Uuid>,
    }

    async fn item(ApiPath(id): ApiPath<Uuid>) -> String {
        id.to_string()
    }

    async fn items(ApiQuery(filter): ApiQuery<Filter>) -> String {
        filter.owner.map(|id| id.to_string()).unwrap_or_default()
    }

    fn item_router() -> Router {
        Router::new()
            .route("/items", get(items))
            .route("/items/:id", get(item))
    }

    async fn call(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = item_router()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_path_and_query_extracted() {
        let id = Uuid::new_v4();

        let (status, body) = call(&format!("/items/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, id.to_string().into_bytes());

        let (status, body) = call(&format!("/items?owner={}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, id.to_string().into_bytes());
    }

    #[tokio::test]
    async fn test_bad_path_id_is_json_bad_request() {
        let (status, body) = call("/items/not-a-uuid").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().unwrap().contains("UUID"));
    }

    #[tokio::test]
    async fn test_bad_query_value_is_json_bad_request() {
        let (status, body) = call("/items?owner=xyz").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 400);
        assert!(body["message"].is_string());
    }
}
