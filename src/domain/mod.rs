pub mod error;
pub mod user;

pub use error::{DomainError, DomainResult, InfraError};
pub use user::{
    AdminUpdateUserDto, Balance, BalanceChanges, CreateUserDto, EditUserParams, ImageChange,
    UpdateUserDto, UploadedImage, User, UserChanges, UserIdentity, UserLookup,
    UserRepositoryInterface, UserRole, UserUpdate,
};
