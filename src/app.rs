// Application state and router assembly

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::addresses::{self, AddressService};
use crate::auth::{self, require_auth, AuthError, AuthService, PasswordService, TokenService};
use crate::config::Config;
use crate::db::DbPool;
use crate::docs::ApiDoc;
use crate::error::{fallback, method_not_allowed_as_not_found, panic_response};
use crate::store::Store;
use crate::users::{self, UserService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub address_service: Arc<AddressService>,
}

impl AppState {
    /// Wire every service onto one pool
    pub fn new(pool: DbPool, config: &Config) -> Result<Self, AuthError> {
        let passwords = PasswordService::new(config.hash_cost)?;
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);

        let auth_service = AuthService::new(Store::new(pool.clone()), passwords.clone(), tokens);
        let user_service = UserService::new(Store::new(pool.clone()), Store::new(pool.clone()), passwords);
        let address_service = AddressService::new(Store::new(pool.clone()), Store::new(pool));

        Ok(Self {
            auth_service: Arc::new(auth_service),
            user_service: Arc::new(user_service),
            address_service: Arc::new(address_service),
        })
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

/// Creates and configures the application router
///
/// Login and registration are public; everything else sits behind
/// `require_auth`. Unknown paths, unsupported methods and handler panics
/// render the standard error body.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/users", post(auth::register_handler));

    let protected = Router::new()
        .route("/users/me", get(users::me_handler))
        .route(
            "/users/:id",
            put(users::update_user_handler).delete(users::delete_user_handler),
        )
        .route(
            "/addresses",
            post(addresses::create_address_handler).get(addresses::list_addresses_handler),
        )
        .route(
            "/addresses/:id",
            get(addresses::get_address_handler)
                .put(addresses::update_address_handler)
                .delete(addresses::delete_address_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .merge(public)
        .merge(protected)
        .fallback(fallback)
        .layer(middleware::map_response(method_not_allowed_as_not_found))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
