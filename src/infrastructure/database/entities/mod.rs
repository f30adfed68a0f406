//! Database entities module

pub mod appointment;
pub mod medical_record;
pub mod patient;
pub mod user;

pub use appointment::Entity as Appointment;
pub use medical_record::Entity as MedicalRecord;
pub use patient::Entity as Patient;
pub use user::Entity as User;
