//! Repository traits for the data access layer
//!
//! Services talk to storage only through these traits:
//!
//! - `*Repository` traits define the operations for each record type
//! - `*RepositoryProvider` traits give access to one repository each
//! - [`RepositoryProvider`] combines them and adds migrations and health checks

pub mod account;
pub mod adapter;
pub mod customer;
#[cfg(test)]
pub(crate) mod mock;
pub mod product;

pub use account::AccountRepository;
pub use adapter::{AccountRepositoryAdapter, CustomerRepositoryAdapter, ProductRepositoryAdapter};
pub use customer::CustomerRepository;
pub use product::ProductRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for account repository access.
pub trait AccountRepositoryProvider: Send + Sync + 'static {
    type AccountRepo: AccountRepository;

    fn account(&self) -> &Self::AccountRepo;
}

/// Provider trait for customer repository access.
pub trait CustomerRepositoryProvider: Send + Sync + 'static {
    type CustomerRepo: CustomerRepository;

    fn customer(&self) -> &Self::CustomerRepo;
}

/// Provider trait for product repository access.
pub trait ProductRepositoryProvider: Send + Sync + 'static {
    type ProductRepo: ProductRepository;

    fn product(&self) -> &Self::ProductRepo;
}

/// Provider trait that storage backends implement to supply every repository.
///
/// ```rust,ignore
/// use timeline_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl AccountRepositoryProvider for MyStorage {
///     type AccountRepo = MyAccountRepository;
///     fn account(&self) -> &Self::AccountRepo { &self.accounts }
/// }
///
/// // ... customer and product providers ...
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider:
    AccountRepositoryProvider + CustomerRepositoryProvider + ProductRepositoryProvider
{
    /// Bring the schema up to date
    async fn migrate(&self) -> Result<(), Error>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<(), Error>;
}
