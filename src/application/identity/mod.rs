//! Identity module: staff accounts and authentication
//!
//! `UserDirectory` covers admin-side user management; `AuthService` covers
//! login and password change for the caller's own account.

pub mod auth;
pub mod directory;

pub use auth::{AuthResult, AuthService, MIN_PASSWORD_LEN};
pub use directory::UserDirectory;
