use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub temporary_password: String,
}
