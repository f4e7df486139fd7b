use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub full_name: Option<String>,
}
