//! Record API: users and their addresses behind bearer-token authentication.
//!
//! Every resource is persisted through the generic [`store::Store`], and every
//! failure is rendered through [`error::ApiError`].

pub mod addresses;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod store;
pub mod users;
pub mod validation;

pub use app::{create_router, AppState};
pub use config::Config;
