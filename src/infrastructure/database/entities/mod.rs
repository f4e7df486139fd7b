//! SeaORM entities

pub mod balance;
pub mod user;
