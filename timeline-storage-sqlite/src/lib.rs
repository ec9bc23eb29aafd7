//! SQLite storage backend for the Timeline API
//!
//! [`SqliteRepositoryProvider`] implements every repository trait from
//! `timeline-core` on top of a single `sqlx` connection pool.
//!
//! ```rust,ignore
//! use timeline_storage_sqlite::SqliteRepositoryProvider;
//!
//! let provider = SqliteRepositoryProvider::connect("sqlite://timeline.db?mode=rwc").await?;
//! provider.migrate().await?;
//! ```
pub mod migrations;
pub mod repositories;

pub use repositories::{SqliteAccountRepository, SqliteCustomerRepository, SqliteProductRepository};

use async_trait::async_trait;
use sqlx::SqlitePool;
use timeline_core::{
    Error,
    error::StorageError,
    repositories::{
        AccountRepositoryProvider, CustomerRepositoryProvider, ProductRepositoryProvider,
        RepositoryProvider,
    },
};

use migrations::{MigrationManager, all_migrations};

pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    account: SqliteAccountRepository,
    customer: SqliteCustomerRepository,
    product: SqliteProductRepository,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            account: SqliteAccountRepository::new(pool.clone()),
            customer: SqliteCustomerRepository::new(pool.clone()),
            product: SqliteProductRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool options
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl AccountRepositoryProvider for SqliteRepositoryProvider {
    type AccountRepo = SqliteAccountRepository;

    fn account(&self) -> &Self::AccountRepo {
        &self.account
    }
}

impl CustomerRepositoryProvider for SqliteRepositoryProvider {
    type CustomerRepo = SqliteCustomerRepository;

    fn customer(&self) -> &Self::CustomerRepo {
        &self.customer
    }
}

impl ProductRepositoryProvider for SqliteRepositoryProvider {
    type ProductRepo = SqliteProductRepository;

    fn product(&self) -> &Self::ProductRepo {
        &self.product
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        let manager = MigrationManager::new(self.pool.clone());
        manager.initialize().await?;
        manager.up(&all_migrations()).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {e}")))?;
        Ok(())
    }
}
