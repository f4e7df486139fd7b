//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

pub use crypto::{JwtAuthIssuer, JwtConfig, PasswordHasher};
pub use database::{init_database, DatabaseConfig, SeaOrmUserRepository};
pub use storage::{InMemoryFileStorage, LocalFileStorage};
