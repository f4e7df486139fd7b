use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// Monetary sub-record owned 1:1 by a user.
#[derive(Clone, Debug, PartialEq)]
pub struct Balance {
    pub user_id: String,
    pub balance: Decimal,
    pub revenue: Decimal,
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub activated: bool,
    /// Filename of the profile image inside the user image directory.
    pub image: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only populated by lookups that ask for it.
    pub balance: Option<Balance>,
}

/// Email/username pair returned by identity lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserIdentity {
    pub email: String,
    pub username: String,
}

/// Unique key for single-user lookups.
#[derive(Clone, Debug)]
pub enum UserLookup {
    Id(String),
    Email(String),
    Username(String),
}
