use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Receptionist,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Receptionist
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Receptionist => "receptionist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "doctor" => Some(Self::Doctor),
            "receptionist" => Some(Self::Receptionist),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User model. `password_hash` stays inside the service; callers only see
/// projections.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub password_hash: String,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Insert payload; the store assigns id and timestamps.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub password_hash: String,
    pub is_active: bool,
    pub must_change_password: bool,
}

/// Rows in other modules that point at a doctor account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoctorLinks {
    pub appointments: u64,
    pub medical_records: u64,
}

impl DoctorLinks {
    pub fn is_empty(&self) -> bool {
        self.appointments == 0 && self.medical_records == 0
    }
}
