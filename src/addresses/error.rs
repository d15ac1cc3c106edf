use crate::error::ApiError;
use crate::store::StoreError;

/// Error types for address operations
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Address not found")]
    NotFound,

    /// The user an address is being created for does not exist
    #[error("User not found")]
    OwnerNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::NotFound => ApiError::NotFound("Address not found.".to_string()),
            AddressError::OwnerNotFound => ApiError::NotFound("User not found.".to_string()),
            AddressError::Store(e) => e.into(),
        }
    }
}
