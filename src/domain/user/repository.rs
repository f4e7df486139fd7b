use async_trait::async_trait;

use super::{CreateUserDto, User, UserChanges, UserIdentity, UserLookup};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a user together with an empty balance record.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn find_unique(
        &self,
        lookup: UserLookup,
        include_balance: bool,
    ) -> DomainResult<Option<User>>;

    /// All users whose email or username equals one of the given values.
    async fn find_by_email_or_username(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> DomainResult<Vec<UserIdentity>>;

    /// Apply `changes` and return the updated user with its balance.
    async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<User>;
}
