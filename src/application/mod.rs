pub mod identity;
pub mod patients;

// Re-export key types for convenience
pub use identity::{AuthResult, AuthService, UserDirectory};
pub use patients::PatientDirectory;
