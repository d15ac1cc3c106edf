// Addresses module
// CRUD over user-owned addresses, built on the generic store

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::AddressError;
pub use handlers::{
    create_address_handler, delete_address_handler, get_address_handler, list_addresses_handler,
    update_address_handler,
};
pub use models::{
    Address, AddressDetail, CreateAddressRequest, ListAddressesQuery, UpdateAddressRequest,
};
pub use service::AddressService;

#[cfg(test)]
mod tests;
