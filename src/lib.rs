//! # Account Service
//!
//! User accounts with profile images and a balance sub-record.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: user model, edit payloads, repository interface, errors
//! - **application**: `UserService` use cases and the outbound ports it drives
//! - **infrastructure**: SeaORM persistence, file storage, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: wiring, bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;

pub use config::{default_config_path, resolve_config_path, AppConfig};

pub use application::{EditUserResult, UserService};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
pub use server::{init_tracing, ServerOptions};
