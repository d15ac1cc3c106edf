// Users module
// Profile lookup, update and cascading removal of user records

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::UserError;
pub use handlers::{delete_user_handler, me_handler, update_user_handler};
pub use models::{normalize_email, NewUser, UpdateUserRequest, User, UserPatch, UserProfile, UserResponse};
pub use service::UserService;
