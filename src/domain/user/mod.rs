//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_edit;
mod dto_update;

// Re-export model types
pub use model::{Balance, User, UserIdentity, UserLookup, UserRole};

// Re-export DTOs
pub use dto_create::CreateUserDto;
pub use dto_edit::{EditUserParams, UploadedImage};
pub use dto_update::{
    AdminUpdateUserDto, BalanceChanges, ImageChange, UpdateUserDto, UserChanges, UserUpdate,
};

// Re-export repository trait
pub use repository::UserRepositoryInterface;
