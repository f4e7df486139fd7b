pub mod jwt;
pub mod password;

pub use jwt::{JwtAuthIssuer, JwtConfig, TokenClaims};
pub use password::PasswordHasher;
