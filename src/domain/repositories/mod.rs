//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::patient::PatientRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Directories hold an `Arc<dyn RepositoryProvider>` and ask for the
/// repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let patient = repos.patients().find_by_id("5f0c...").await?;
///     let admins = repos.users().count_active_admins().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn patients(&self) -> &dyn PatientRepository;
    fn users(&self) -> &dyn UserRepository;
}
