//! Versioned schema migrations
//!
//! Each migration runs in its own transaction together with the insert of its
//! tracking row, so a failed migration leaves neither schema changes nor a
//! record behind.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use timeline_core::error::StorageError;

pub const MIGRATION_TABLE: &str = "_timeline_migrations";

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<MigrationError> for timeline_core::Error {
    fn from(error: MigrationError) -> Self {
        StorageError::Migration(error.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()>;

    async fn down(&self, conn: &mut SqliteConnection) -> Result<()>;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    /// Unix seconds
    pub applied_at: i64,
}

/// Every migration of the schema, in version order.
pub fn all_migrations() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(CreateUsersTable),
        Box::new(CreateCustomersTable),
        Box::new(CreateProductsTable),
    ]
}

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the tracking table if it does not exist yet
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {MIGRATION_TABLE} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL
            );"#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Apply every migration that has not been applied yet
    pub async fn up(&self, migrations: &[Box<dyn Migration>]) -> Result<()> {
        for migration in migrations {
            if self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Applying migration"
            );
            migration.up(&mut *tx).await?;

            sqlx::query(&format!(
                "INSERT INTO {MIGRATION_TABLE} (version, name, applied_at) VALUES (?, ?, ?)"
            ))
            .bind(migration.version())
            .bind(migration.name())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }
        Ok(())
    }

    /// Roll back applied migrations, newest first
    pub async fn down(&self, migrations: &[Box<dyn Migration>]) -> Result<()> {
        for migration in migrations.iter().rev() {
            if !self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Rolling back migration"
            );
            migration.down(&mut *tx).await?;

            sqlx::query(&format!("DELETE FROM {MIGRATION_TABLE} WHERE version = ?"))
                .bind(migration.version())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
        }
        Ok(())
    }

    pub async fn applied_migrations(&self) -> Result<Vec<MigrationRecord>> {
        let records = sqlx::query_as::<_, MigrationRecord>(&format!(
            "SELECT version, name, applied_at FROM {MIGRATION_TABLE} ORDER BY version"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn is_applied(&self, version: i64) -> Result<bool> {
        let applied: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {MIGRATION_TABLE} WHERE version = ?)"
        ))
        .bind(version)
        .fetch_one(&self.pool)
        .await?;
        Ok(applied)
    }
}

/// Record timestamp columns in every table hold unix milliseconds.
pub struct CreateUsersTable;

#[async_trait]
impl Migration for CreateUsersTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &str {
        "CreateUsersTable"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'USER',
                email_confirmed INTEGER NOT NULL DEFAULT 0,
                failed_login_attempts INTEGER NOT NULL DEFAULT 0,
                lock_until INTEGER,
                last_login INTEGER,
                avatar_url TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(email)
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateCustomersTable;

#[async_trait]
impl Migration for CreateCustomersTable {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &str {
        "CreateCustomersTable"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT,
                address TEXT,
                city TEXT,
                state TEXT,
                postal_code TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(email)
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS customers")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateProductsTable;

#[async_trait]
impl Migration for CreateProductsTable {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &str {
        "CreateProductsTable"
    }

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS products")
            .execute(conn)
            .await?;
        Ok(())
    }
}
