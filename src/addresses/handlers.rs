// HTTP handlers for address endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::addresses::{
    Address, AddressDetail, CreateAddressRequest, ListAddressesQuery, UpdateAddressRequest,
};
use crate::app::AppState;
use crate::auth::middleware::AuthenticatedUser;
use crate::error::{ApiError, ErrorResponse};
use crate::validation::{ApiPath, ApiQuery, ValidatedJson};

/// Create a new address
/// POST /addresses
#[utoipa::path(
    post,
    path = "/addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "addresses"
)]
pub async fn create_address_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateAddressRequest>,
) -> Result<(StatusCode, Json<Address>), ApiError> {
    let address = state.address_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// List addresses with optional filters
/// GET /addresses
#[utoipa::path(
    get,
    path = "/addresses",
    params(ListAddressesQuery),
    responses(
        (status = 200, description = "Addresses, newest first", body = [Address]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "addresses"
)]
pub async fn list_addresses_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<ListAddressesQuery>,
) -> Result<Json<Vec<Address>>, ApiError> {
    tracing::debug!("Listing addresses with {:?}", query);

    let addresses = state.address_service.list(query).await?;
    Ok(Json(addresses))
}

/// Get a single address with its owner
/// GET /addresses/{id}
#[utoipa::path(
    get,
    path = "/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address found", body = AddressDetail),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "addresses"
)]
pub async fn get_address_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<AddressDetail>, ApiError> {
    let detail = state.address_service.find_by_id(id).await?;
    Ok(Json(detail))
}

/// Update an address
/// PUT /addresses/{id}
#[utoipa::path(
    put,
    path = "/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body = UpdateAddressRequest,
    responses(
        (status = 200, description = "Address updated", body = Address),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "addresses"
)]
pub async fn update_address_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateAddressRequest>,
) -> Result<Json<Address>, ApiError> {
    let address = state.address_service.update(id, request).await?;
    Ok(Json(address))
}

/// Delete an address
/// DELETE /addresses/{id}
#[utoipa::path(
    delete,
    path = "/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "addresses"
)]
pub async fn delete_address_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.address_service.destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
