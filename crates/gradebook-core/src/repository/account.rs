//! Account repository trait definition.

use gradebook_types::academic::Account;
use gradebook_types::error::RepositoryError;

/// Repository trait for user accounts (students, teachers, administrators).
///
/// Implementations live in gradebook-infra (e.g., SqliteAccountRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Fails with `Conflict` if the user id is taken.
    fn create(
        &self,
        account: &Account,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get an account by login id.
    fn get(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// List every account, ordered by user id.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Account>, RepositoryError>> + Send;

    /// Overwrite the mutable fields (name, gender, age, password hash).
    /// Returns `NotFound` if the account does not exist.
    fn update(
        &self,
        account: &Account,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
