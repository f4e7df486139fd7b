//! Users module: registration, lookup, activation and profile edits

pub mod dto;
pub mod handlers;
pub mod multipart;

pub use dto::*;
pub use handlers::*;
