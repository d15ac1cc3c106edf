use uuid::Uuid;

use crate::addresses::{
    Address, AddressDetail, AddressError, CreateAddressRequest, ListAddressesQuery,
    UpdateAddressRequest,
};
use crate::store::{Criteria, SortOrder, Store, StoreError};
use crate::users::User;

/// Default page size when only `page` is supplied
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Service layer for address business logic
#[derive(Clone)]
pub struct AddressService {
    addresses: Store<Address>,
    users: Store<User>,
}

impl AddressService {
    /// Create a new AddressService
    pub fn new(addresses: Store<Address>, users: Store<User>) -> Self {
        Self { addresses, users }
    }

    /// Create an address for an existing user
    pub async fn create(&self, request: CreateAddressRequest) -> Result<Address, AddressError> {
        if self.users.find_by_id(request.user_id).await?.is_none() {
            tracing::warn!("Address owner {} does not exist", request.user_id);
            return Err(AddressError::OwnerNotFound);
        }

        // The owner can still be deleted between the check and the insert;
        // the foreign key catches that case.
        let address = self.addresses.insert(request).await.map_err(|e| match e {
            StoreError::MissingReference(_) => AddressError::OwnerNotFound,
            other => AddressError::Store(other),
        })?;

        tracing::info!("Created address {} for user {}", address.id, address.user_id);
        Ok(address)
    }

    /// One address together with its owner
    pub async fn find_by_id(&self, id: Uuid) -> Result<AddressDetail, AddressError> {
        let address = self
            .addresses
            .find_by_id(id)
            .await?
            .ok_or(AddressError::NotFound)?;

        let user = self
            .users
            .find_by_id(address.user_id)
            .await?
            .ok_or(AddressError::OwnerNotFound)?;

        Ok(AddressDetail {
            address,
            user: user.into(),
        })
    }

    /// Addresses matching the query, newest first
    pub async fn list(&self, query: ListAddressesQuery) -> Result<Vec<Address>, AddressError> {
        Ok(self.addresses.list(&list_criteria(query)).await?)
    }

    /// Change any subset of an address's fields
    pub async fn update(&self, id: Uuid, request: UpdateAddressRequest) -> Result<Address, AddressError> {
        let address = self.addresses.update(id, request).await.map_err(|e| match e {
            StoreError::NotFound { .. } => AddressError::NotFound,
            other => AddressError::Store(other),
        })?;

        tracing::info!("Updated address {}", id);
        Ok(address)
    }

    pub async fn destroy(&self, id: Uuid) -> Result<(), AddressError> {
        self.addresses.destroy(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => AddressError::NotFound,
            other => AddressError::Store(other),
        })?;

        tracing::info!("Deleted address {}", id);
        Ok(())
    }
}

/// Translate list query parameters into store criteria
///
/// `state` and `country` match anywhere in the stored value, ignoring case.
fn list_criteria(query: ListAddressesQuery) -> Criteria {
    let mut criteria = Criteria::new().order_by("created_at", SortOrder::Desc);

    if let Some(user_id) = query.user_id {
        criteria = criteria.eq("user_id", user_id);
    }
    if let Some(state) = query.state.filter(|s| !s.trim().is_empty()) {
        criteria = criteria.ilike("state", contains_pattern(&state));
    }
    if let Some(country) = query.country.filter(|c| !c.trim().is_empty()) {
        criteria = criteria.ilike("country", contains_pattern(&country));
    }

    match (query.page, query.limit) {
        (page, Some(limit)) => criteria.paginate(page.unwrap_or(1), limit),
        (Some(page), None) => criteria.paginate(page, DEFAULT_PAGE_SIZE),
        (None, None) => criteria,
    }
}

/// `%term%` with the ILIKE wildcards in `term` escaped
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
