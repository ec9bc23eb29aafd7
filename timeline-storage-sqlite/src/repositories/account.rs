use async_trait::async_trait;
use sqlx::SqlitePool;
use timeline_core::{
    Account, AccountId, Error, NewAccount, Role, repositories::AccountRepository,
};

use super::{map_sqlx_err, optional_timestamp, timestamp};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteAccount {
    id: i64,
    full_name: String,
    email: String,
    password_hash: String,
    role: String,
    email_confirmed: bool,
    failed_login_attempts: i64,
    lock_until: Option<i64>,
    last_login: Option<i64>,
    avatar_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteAccount> for Account {
    type Error = Error;

    fn try_from(row: SqliteAccount) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId::new(row.id),
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            role: Role::parse_or_default(Some(&row.role)),
            email_confirmed: row.email_confirmed,
            failed_login_attempts: u32::try_from(row.failed_login_attempts).unwrap_or(0),
            lock_until: optional_timestamp(row.lock_until)?,
            last_login: optional_timestamp(row.last_login)?,
            avatar_url: row.avatar_url,
            created_at: timestamp(row.created_at)?,
            updated_at: timestamp(row.updated_at)?,
        })
    }
}

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let now = chrono::Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SqliteAccount>(
            r#"
            INSERT INTO users (full_name, email, password_hash, role, email_confirmed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING *
            "#,
        )
        .bind(&account.full_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.email_confirmed)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_err(e, "Failed to create user"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, Error> {
        sqlx::query_as::<_, SqliteAccount>("SELECT * FROM users WHERE id = ?1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to find user by id"))?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        sqlx::query_as::<_, SqliteAccount>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to find user by email"))?
            .map(Account::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Account>, Error> {
        sqlx::query_as::<_, SqliteAccount>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to list users"))?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn update(&self, account: &Account) -> Result<Account, Error> {
        let now = chrono::Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SqliteAccount>(
            r#"
            UPDATE users
            SET full_name = ?2, email = ?3, password_hash = ?4, role = ?5, email_confirmed = ?6,
                failed_login_attempts = ?7, lock_until = ?8, last_login = ?9, avatar_url = ?10,
                updated_at = ?11
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(account.id.into_inner())
        .bind(&account.full_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.email_confirmed)
        .bind(i64::from(account.failed_login_attempts))
        .bind(account.lock_until.map(|t| t.timestamp_millis()))
        .bind(account.last_login.map(|t| t.timestamp_millis()))
        .bind(&account.avatar_url)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_err(e, "Failed to update user"))?
        .ok_or(timeline_core::error::StorageError::NotFound("User"))?;

        row.try_into()
    }

    async fn delete(&self, id: AccountId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_err(e, "Failed to delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
