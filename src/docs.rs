// OpenAPI document served by Swagger UI

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::addresses::{self, Address, AddressDetail, CreateAddressRequest, UpdateAddressRequest};
use crate::auth::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::error::ErrorResponse;
use crate::users::{self, UpdateUserRequest, UserProfile, UserResponse};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        auth::handlers::register_handler,
        users::handlers::me_handler,
        users::handlers::update_user_handler,
        users::handlers::delete_user_handler,
        addresses::handlers::create_address_handler,
        addresses::handlers::list_addresses_handler,
        addresses::handlers::get_address_handler,
        addresses::handlers::update_address_handler,
        addresses::handlers::delete_address_handler,
    ),
    components(
        schemas(
            LoginRequest,
            RegisterRequest,
            AuthResponse,
            UserResponse,
            UserProfile,
            UpdateUserRequest,
            Address,
            AddressDetail,
            CreateAddressRequest,
            UpdateAddressRequest,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Session token issuance"),
        (name = "users", description = "User registration and profile management"),
        (name = "addresses", description = "Addresses owned by users")
    ),
    info(
        title = "Record API",
        version = "1.0.0",
        description = "Users and their addresses behind bearer-token authentication"
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
