use async_trait::async_trait;

use super::{CreatePatientDto, ListPatientsQuery, Patient, UpdatePatientDto};
use crate::domain::DomainResult;
use crate::shared::OffsetPage;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Insert a patient; the store assigns id and timestamps
    async fn create(&self, dto: CreatePatientDto) -> DomainResult<Patient>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Patient>>;

    async fn exists(&self, id: &str) -> DomainResult<bool>;

    /// Filtered count and page fetch, read in a single transaction
    async fn list(&self, query: &ListPatientsQuery) -> DomainResult<OffsetPage<Patient>>;

    /// Apply a patch; fails with `NotFound` if the row is gone
    async fn update(&self, id: &str, dto: UpdatePatientDto) -> DomainResult<Patient>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
