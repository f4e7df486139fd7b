//! Password hashing

use bcrypt::{hash, verify};

use crate::domain::InfraError;

pub use bcrypt::DEFAULT_COST;

/// bcrypt hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// `cost` is clamped to the range bcrypt accepts (4..=31).
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, InfraError> {
        hash(password, self.cost)
            .map_err(|e| InfraError::Crypto(format!("Failed to hash password: {}", e)))
    }

    /// `false` for a malformed hash as well as for a wrong password.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
