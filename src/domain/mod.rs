//! Domain layer: aggregates, repository ports and business rules.

pub mod patient;
pub mod repositories;
pub mod user;

pub use patient::{
    CreatePatientDto, Gender, ListPatientsQuery, Patient, PatientRepository, PatientSort,
    UpdatePatientDto,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{
    CreateUserDto, DoctorLinks, ListUsersQuery, NewUser, User, UserRepository, UserRole,
};

pub use crate::shared::errors::DomainError;
