// Authentication module
// Argon2 credential hashing, JWT session tokens, login/registration and the
// middleware that guards protected routes

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, register_handler};
pub use middleware::{bearer_token, require_auth, AuthenticatedUser};
pub use models::{AuthResponse, LoginRequest, RegisterRequest};
pub use password::PasswordService;
pub use service::AuthService;
pub use token::{Claims, SessionClaims, TokenService};
