use super::Gender;

#[derive(Debug, Clone)]
pub struct CreatePatientDto {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
}
