use crate::auth::AuthError;
use crate::error::ApiError;
use crate::store::StoreError;

/// Error types for user profile operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailTaken,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => ApiError::NotFound("User not found.".to_string()),
            UserError::EmailTaken => AuthError::EmailTaken.into(),
            UserError::Auth(e) => e.into(),
            UserError::Store(e) => e.into(),
        }
    }
}
