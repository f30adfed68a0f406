//! Patient aggregate
//!
//! Contains the Patient entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_list;
mod dto_update;

pub use model::{Gender, Patient};

pub use dto_create::CreatePatientDto;
pub use dto_list::{ListPatientsQuery, PatientSort};
pub use dto_update::UpdatePatientDto;

pub use repository::PatientRepository;
