use crate::error::ApiError;

/// Failures raised by the generic entity store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the identifier (update, destroy) or no row was
    /// affected by a bulk delete
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A unique constraint rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist
    #[error("referenced row does not exist: {0}")]
    MissingReference(String),

    /// Criteria named a column outside the entity's column list
    #[error("unknown column in criteria: {0}")]
    UnknownColumn(&'static str),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

/// Classify sqlx errors so constraint failures keep their meaning
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity } => ApiError::NotFound(format!("{} not found.", entity)),
            StoreError::Conflict(constraint) => {
                tracing::debug!("Unique constraint violated: {}", constraint);
                ApiError::Conflict("Record already exists.".to_string())
            }
            StoreError::MissingReference(constraint) => {
                tracing::debug!("Foreign key violated: {}", constraint);
                ApiError::NotFound("Referenced record not found.".to_string())
            }
            other => ApiError::internal(other),
        }
    }
}
