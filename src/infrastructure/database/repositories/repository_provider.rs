//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::patient::PatientRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;

use super::patient_repository::SeaOrmPatientRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let patient = repos.patients().find_by_id(&id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    patients: SeaOrmPatientRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            patients: SeaOrmPatientRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn patients(&self) -> &dyn PatientRepository {
        &self.patients
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
