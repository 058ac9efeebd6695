//! PasswordHasher trait for credential storage.
//!
//! Defined in gradebook-core so services can hash and verify passwords
//! without coupling to a specific algorithm. The `Argon2PasswordHasher`
//! adapter lives in gradebook-infra.

use gradebook_types::error::AuthError;

/// Abstraction over password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a clear-text password into a self-describing string (PHC format).
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a clear-text password against a stored hash. A malformed hash
    /// never verifies.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
