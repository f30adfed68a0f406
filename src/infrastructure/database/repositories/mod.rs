//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod patient_repository;
pub mod repository_provider;
pub mod user_repository;

pub use patient_repository::SeaOrmPatientRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
