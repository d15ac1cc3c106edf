// Authentication error types

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::store::StoreError;

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password; callers cannot tell which
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// The token verified but its user has since been deleted
    #[error("Token subject no longer exists")]
    SubjectGone,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::BadRequest("Invalid email or password.".to_string())
            }
            AuthError::EmailTaken => ApiError::Conflict("Email already exists.".to_string()),
            e @ (AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::SubjectGone) => ApiError::Unauthorized(e.to_string()),
            e @ (AuthError::PasswordHash(_) | AuthError::TokenGeneration(_)) => ApiError::internal(e),
            AuthError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
