//! User directory: admin-side user management
//!
//! Every guarded mutation loads the current state, runs the predicates from
//! `domain::user::guards` in a fixed order, and only then writes. A rejected
//! guard never leaves a partial change behind.
//!
//! The email pre-check and the active-admin count are read-then-act. The
//! unique index on `users.email` catches the email race; the admin count has
//! no store-level backstop.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::guards;
use crate::domain::user::{
    RoleChange, StatusChange, UserDetails, UserProfile, UserSummary,
};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, ListUsersQuery, NewUser, RepositoryProvider,
    UserRole,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::shared::{Confirmation, OffsetPage};

pub struct UserDirectory {
    repos: Arc<dyn RepositoryProvider>,
    hash_cost: u32,
}

impl UserDirectory {
    pub fn new(repos: Arc<dyn RepositoryProvider>, hash_cost: u32) -> Self {
        Self { repos, hash_cost }
    }

    /// Create an account on behalf of an admin. The account is active and
    /// must change its temporary password on first login.
    pub async fn create_by_admin(&self, dto: CreateUserDto) -> DomainResult<UserProfile> {
        let existing = self.repos.users().find_by_email(&dto.email).await?;
        guards::ensure_email_available(existing.as_ref())?;

        let password_hash = hash_password(&dto.temporary_password, self.hash_cost)
            .map_err(|e| DomainError::Crypto(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                email: dto.email,
                first_name: dto.first_name,
                last_name: dto.last_name,
                role: dto.role,
                password_hash,
                is_active: true,
                must_change_password: true,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User created by admin");
        Ok(user.into())
    }

    /// Every user, oldest first. Unpaginated; fine for staff-sized tables.
    pub async fn find_all(&self) -> DomainResult<Vec<UserSummary>> {
        let users = self.repos.users().find_all().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    pub async fn list(&self, query: ListUsersQuery) -> DomainResult<OffsetPage<UserProfile>> {
        let page = self.repos.users().list(&query).await?;
        Ok(page.map(UserProfile::from))
    }

    pub async fn update_role(&self, new_role: UserRole, id: &str) -> DomainResult<RoleChange> {
        let user = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if guards::demotes_admin(user.role, new_role) {
            let active_admins = self.repos.users().count_active_admins().await?;
            if let Err(e) = guards::ensure_admin_remains(user.role, new_role, active_admins) {
                warn!(user_id = %id, active_admins, "Refused to demote last active admin");
                return Err(e);
            }
        }

        let updated = self.repos.users().update_role(id, new_role).await?;
        info!(user_id = %id, from = %user.role, to = %new_role, "User role changed");
        Ok(updated.into())
    }

    /// A missing user is reported as `BadRequest`, not `NotFound`.
    pub async fn update_status(&self, id: &str, is_active: bool) -> DomainResult<StatusChange> {
        if self.repos.users().find_by_id(id).await?.is_none() {
            return Err(DomainError::BadRequest("User not found".into()));
        }

        let updated = self.repos.users().update_status(id, is_active).await?;
        info!(user_id = %id, is_active, "User status changed");
        Ok(updated.into())
    }

    /// Delete a user. Checks run in order: existence, self, admin, doctor
    /// linkage; the first failure is reported.
    pub async fn remove(&self, id: &str, requester_id: &str) -> DomainResult<Confirmation> {
        let user = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        guards::ensure_not_self(id, requester_id)?;
        guards::ensure_not_admin(user.role)?;

        if user.role == UserRole::Doctor {
            let links = self.repos.users().count_doctor_links(id).await?;
            if let Err(e) = guards::ensure_no_doctor_links(&links) {
                warn!(
                    user_id = %id,
                    appointments = links.appointments,
                    medical_records = links.medical_records,
                    "Refused to delete linked doctor"
                );
                return Err(e);
            }
        }

        self.repos.users().delete(id).await?;
        info!(user_id = %id, deleted_by = %requester_id, "User deleted");
        Ok(Confirmation::new("User deleted"))
    }

    /// `None` when the user does not exist.
    pub async fn get_user(&self, id: &str) -> DomainResult<Option<UserDetails>> {
        let user = self.repos.users().find_by_id(id).await?;
        Ok(user.map(UserDetails::from))
    }
}
