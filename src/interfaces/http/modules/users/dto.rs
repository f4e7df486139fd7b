//! User DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{AuthResult, EditUserResult};
use crate::domain::{Balance, CreateUserDto, User};

/// User API representation. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub activated: bool,
    pub image: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceDto>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role.as_str().to_string(),
            activated: u.activated,
            image: u.image,
            full_name: u.full_name,
            bio: u.bio,
            created_at: u.created_at,
            updated_at: u.updated_at,
            balance: u.balance.map(BalanceDto::from),
        }
    }
}

/// Monetary amounts are serialized as decimal strings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceDto {
    #[schema(value_type = String, example = "0.00")]
    pub balance: Decimal,
    #[schema(value_type = String, example = "0.00")]
    pub revenue: Decimal,
}

impl From<Balance> for BalanceDto {
    fn from(b: Balance) -> Self {
        Self {
            balance: b.balance,
            revenue: b.revenue,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            role: None,
            full_name: r.full_name,
        }
    }
}

/// Fresh credentials, returned when an edit changed the email or username.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: i64,
}

impl From<AuthResult> for AuthResponse {
    fn from(a: AuthResult) -> Self {
        Self {
            access_token: a.token,
            token_type: a.token_type,
            expires_in: a.expires_in,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditUserResponse {
    pub user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthResponse>,
}

impl From<EditUserResult> for EditUserResponse {
    fn from(r: EditUserResult) -> Self {
        Self {
            user: UserDto::from(r.user),
            auth: r.new_auth.map(AuthResponse::from),
        }
    }
}

/// Multipart body accepted by the edit endpoints (documentation only).
///
/// Empty text parts are ignored. `balance` and `revenue` are only honoured on
/// the admin endpoint.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct EditUserMultipart {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    /// `true` to remove the current image. Ignored when `image` is sent.
    pub delete_image: Option<bool>,
    #[schema(value_type = Option<String>, example = "10.50")]
    pub balance: Option<String>,
    #[schema(value_type = Option<String>, example = "0.00")]
    pub revenue: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}
