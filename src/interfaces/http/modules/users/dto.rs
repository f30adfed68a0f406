//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::user::{RoleChange, StatusChange, UserDetails, UserProfile, UserSummary};
use crate::domain::{CreateUserDto, ListUsersQuery, UserRole};

/// Profile returned by create and list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileDto {
    fn from(u: UserProfile) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDetailsDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<UserDetails> for UserDetailsDto {
    fn from(u: UserDetails) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleChangeDto {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl From<RoleChange> for RoleChangeDto {
    fn from(c: RoleChange) -> Self {
        Self {
            id: c.id,
            email: c.email,
            role: c.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusChangeDto {
    pub id: String,
    pub email: String,
    pub is_active: bool,
}

impl From<StatusChange> for StatusChangeDto {
    fn from(c: StatusChange) -> Self {
        Self {
            id: c.id,
            email: c.email,
            is_active: c.is_active,
        }
    }
}

/// Create user request. The account starts active and must change the
/// temporary password on first login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "first name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last name must be 1-100 characters"))]
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[validate(length(min = 8, max = 128, message = "temporary password must be 8-128 characters"))]
    pub temporary_password: String,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            role: r.role,
            temporary_password: r.temporary_password,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

/// List users query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Case-insensitive substring over email, first name, last name
    pub q: Option<String>,
    pub offset: Option<u64>,
    /// Page size, 20 when absent or zero
    pub limit: Option<u64>,
}

impl From<ListUsersParams> for ListUsersQuery {
    fn from(p: ListUsersParams) -> Self {
        ListUsersQuery::new(p.q, p.offset, p.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_receptionist() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"email":"r@clinic.uz","first_name":"R","last_name":"S","temporary_password":"12345678"}"#,
        )
        .unwrap();
        assert_eq!(req.role, UserRole::Receptionist);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_temporary_password_fails_validation() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"email":"r@clinic.uz","first_name":"R","last_name":"S","role":"doctor","temporary_password":"123"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn unknown_role_does_not_parse() {
        let parsed: Result<UpdateRoleRequest, _> = serde_json::from_str(r#"{"role":"janitor"}"#);
        assert!(parsed.is_err());
    }
}
