use crate::{
    Error,
    account::{Account, AccountId, NewAccount},
};
use async_trait::async_trait;

/// Repository for account data access
///
/// `email` is a unique key. Implementations report an insert or update that
/// would duplicate it as [`StorageError::Constraint`](crate::error::StorageError::Constraint).
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Insert a new account, assigning its id and timestamps
    async fn create(&self, account: NewAccount) -> Result<Account, Error>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error>;

    /// Find an account by exact (case-sensitive) email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error>;

    /// All accounts, oldest first
    async fn list(&self) -> Result<Vec<Account>, Error>;

    /// Persist every mutable field of `account` and bump `updated_at`
    async fn update(&self, account: &Account) -> Result<Account, Error>;

    /// Delete an account, returning whether one was removed
    async fn delete(&self, id: AccountId) -> Result<bool, Error>;
}
