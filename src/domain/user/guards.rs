//! User lifecycle guards
//!
//! Pure predicates over already-loaded state. Each returns `Ok(())` when the
//! mutation may proceed. `UserDirectory` evaluates them before it touches the
//! store, in the order documented on each operation.

use super::{DoctorLinks, User, UserRole};
use crate::domain::{DomainError, DomainResult};

pub const LAST_ADMIN_MESSAGE: &str = "At least one active admin must remain";
pub const SELF_DELETE_MESSAGE: &str = "You cannot delete your own account";
pub const DOCTOR_LINKED_MESSAGE: &str =
    "Doctor has related appointments/records. Reassign or archive before deletion.";
pub const EMAIL_IN_USE_MESSAGE: &str = "Email already in use";

/// Whether moving from `current` to `requested` takes an admin away, so the
/// active-admin count has to be consulted.
pub fn demotes_admin(current: UserRole, requested: UserRole) -> bool {
    current == UserRole::Admin && requested != UserRole::Admin
}

/// Reject a demotion when `active_admins` (including the target) is one or
/// fewer.
pub fn ensure_admin_remains(
    current: UserRole,
    requested: UserRole,
    active_admins: u64,
) -> DomainResult<()> {
    if demotes_admin(current, requested) && active_admins <= 1 {
        return Err(DomainError::BadRequest(LAST_ADMIN_MESSAGE.into()));
    }
    Ok(())
}

pub fn ensure_email_available(existing: Option<&User>) -> DomainResult<()> {
    match existing {
        Some(_) => Err(DomainError::Conflict(EMAIL_IN_USE_MESSAGE.into())),
        None => Ok(()),
    }
}

pub fn ensure_not_self(target_id: &str, requester_id: &str) -> DomainResult<()> {
    if target_id == requester_id {
        return Err(DomainError::Forbidden(SELF_DELETE_MESSAGE.into()));
    }
    Ok(())
}

/// Admin accounts cannot be deleted through this path at all.
pub fn ensure_not_admin(role: UserRole) -> DomainResult<()> {
    if role == UserRole::Admin {
        return Err(DomainError::BadRequest(LAST_ADMIN_MESSAGE.into()));
    }
    Ok(())
}

pub fn ensure_no_doctor_links(links: &DoctorLinks) -> DomainResult<()> {
    if !links.is_empty() {
        return Err(DomainError::BadRequest(DOCTOR_LINKED_MESSAGE.into()));
    }
    Ok(())
}
