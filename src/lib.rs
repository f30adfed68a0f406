//! # Clinic Service
//!
//! Patient and staff directories for a clinic back office: patient cards
//! with search and paging, admin-managed staff accounts with lifecycle
//! guards, JWT authentication, and a REST API with Swagger documentation.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: entities, DTOs, repository traits and user guards
//! - **application**: `PatientDirectory`, `UserDirectory`, `AuthService`
//! - **infrastructure**: SeaORM persistence, migrations, password hashing, JWT
//! - **interfaces**: axum REST API
//! - **shared**: errors, pagination, `Patch<T>`, graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};
