use super::Gender;
use crate::shared::Patch;

/// Field-wise patient update; `Patch::Keep` fields are left as stored.
#[derive(Debug, Clone, Default)]
pub struct UpdatePatientDto {
    pub first_name: Patch<String>,
    pub last_name: Patch<String>,
    pub gender: Patch<Gender>,
    pub phone: Patch<String>,
    pub email: Patch<String>,
    pub notes: Patch<Option<String>>,
}
