// Authentication request and response DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::UserResponse;
use crate::validation::validate_not_blank;

/// Login request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format."))]
    #[schema(example = "ana@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(max = 100, message = "Name must not exceed 100 characters."),
        custom = "validate_not_blank"
    )]
    #[schema(example = "Ana")]
    pub name: String,

    #[validate(
        email(message = "Invalid email format."),
        length(max = 150, message = "Email must not exceed 150 characters.")
    )]
    #[schema(example = "ana@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Authentication response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub data: UserResponse,
}
