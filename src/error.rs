// Error handling module for the Record API
// Provides the error taxonomy shared by every resource and its HTTP rendering

use std::any::Any;
use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use utoipa::ToSchema;

/// Generic message returned for every 401 so callers cannot tell
/// a missing token from a forged, expired or orphaned one
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized.";

const INTERNAL_MESSAGE: &str = "Internal server error.";
const VALIDATION_MESSAGE: &str = "Bad Request.";

/// The fixed set of failure kinds a request can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    ValidationFailed,
    Internal,
}

impl ErrorKind {
    /// Canonical status code for each kind
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main error type for the API
/// All handlers return Result<T, ApiError>, and every domain error
/// (auth, store, validation) converts into exactly one variant.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Maps to HTTP 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    /// Maps to HTTP 401 Unauthorized
    /// The message is logged; the client always sees the generic one
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Maps to HTTP 404 Not Found
    #[error("{0}")]
    NotFound(String),

    /// Maps to HTTP 409 Conflict
    #[error("{0}")]
    Conflict(String),

    /// Field-level validation failures, field name to message
    /// Maps to HTTP 400 Bad Request
    #[error("request validation failed")]
    ValidationFailed(BTreeMap<String, String>),

    /// Anything unanticipated. The cause is logged, never sent
    /// Maps to HTTP 500 Internal Server Error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape of every error body. `code` always equals the HTTP status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = 404)]
    pub code: u16,

    #[schema(example = "User not found.")]
    pub message: String,

    /// Present only for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// Wrap an unexpected failure, keeping its description for the server log
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        ApiError::Internal(cause.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::BadRequest,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity: error! for 500s, warn! for
    /// auth failures and conflicts, debug! for expected client errors.
    pub fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let (message, errors) = match self {
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                (message.clone(), None)
            }
            ApiError::Unauthorized(reason) => {
                warn!("Unauthorized request: {}", reason);
                (UNAUTHORIZED_MESSAGE.to_string(), None)
            }
            ApiError::NotFound(message) => {
                debug!("Not found: {}", message);
                (message.clone(), None)
            }
            ApiError::Conflict(message) => {
                warn!("Conflict: {}", message);
                (message.clone(), None)
            }
            ApiError::ValidationFailed(fields) => {
                debug!("Validation failed: {:?}", fields);
                (VALIDATION_MESSAGE.to_string(), Some(fields.clone()))
            }
            ApiError::Internal(cause) => {
                error!("Internal error: {}", cause);
                (INTERNAL_MESSAGE.to_string(), None)
            }
        };

        (
            status,
            ErrorResponse {
                code: status.as_u16(),
                message,
                errors,
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();

        ApiError::ValidationFailed(fields)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        // Missing route params are a router wiring bug, not a client error
        if rejection.status().is_server_error() {
            ApiError::Internal(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Internal(format!("database: {error}"))
    }
}

/// Router fallback so unknown paths use the same error body
pub async fn fallback() -> ApiError {
    ApiError::NotFound("Route not found.".to_string())
}

/// Known path, unsupported method. There is no 405 kind, so the
/// response is rewritten to the same body as an unknown route.
pub async fn method_not_allowed_as_not_found(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        ApiError::NotFound("Route not found.".to_string()).into_response()
    } else {
        response
    }
}

/// Renders a handler panic as a plain 500
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
