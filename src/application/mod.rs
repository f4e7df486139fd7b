pub mod identity;
pub mod ports;

// Re-export key types for convenience
pub use identity::{EditUserResult, UserService};
pub use ports::{AuthIssuer, AuthResult, CleanupOutcome, FileStorage};
