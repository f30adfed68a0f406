use async_trait::async_trait;

use super::{DoctorLinks, ListUsersQuery, NewUser, User, UserRole};
use crate::domain::DomainResult;
use crate::shared::OffsetPage;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. A duplicate email surfaces as `Conflict`.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_all(&self) -> DomainResult<Vec<User>>;

    /// Filtered count and page fetch, read in a single transaction
    async fn list(&self, query: &ListUsersQuery) -> DomainResult<OffsetPage<User>>;

    async fn count(&self) -> DomainResult<u64>;
    async fn count_active_admins(&self) -> DomainResult<u64>;

    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<User>;
    async fn update_status(&self, id: &str, is_active: bool) -> DomainResult<User>;
    async fn update_password(
        &self,
        id: &str,
        password_hash: &str,
        must_change_password: bool,
    ) -> DomainResult<()>;

    /// Appointment and medical-record counts, read in a single transaction
    async fn count_doctor_links(&self, doctor_id: &str) -> DomainResult<DoctorLinks>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
