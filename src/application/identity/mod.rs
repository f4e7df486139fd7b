//! Identity module: account management
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: registration, lookups, activation and profile edits.

pub mod service;

#[cfg(test)]
mod tests;

pub use service::{EditUserResult, UserService};
