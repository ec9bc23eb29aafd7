use std::sync::Arc;

use crate::{
    Error,
    account::{Account, AccountId, AccountUpdate, NewAccount, Role},
    crypto::hash_password,
    error::{AuthError, StorageError},
    repositories::AccountRepository,
    validation::{validate_email, validate_password},
};

/// Validate, hash and insert a new account.
///
/// An unparseable role falls back to [`Role::User`]. A duplicate email is
/// reported as [`AuthError::DuplicateEmail`] whether it is caught by the
/// lookup or by the store's unique constraint.
pub(crate) async fn insert_account<A: AccountRepository>(
    accounts: &A,
    full_name: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<Account, Error> {
    validate_email(email)?;
    validate_password(password)?;

    if accounts.find_by_email(email).await?.is_some() {
        return Err(AuthError::DuplicateEmail.into());
    }

    let new_account = NewAccount::new(
        full_name.to_string(),
        email.to_string(),
        hash_password(password),
        Role::parse_or_default(role),
    );

    accounts
        .create(new_account)
        .await
        .map_err(duplicate_email_on_constraint)
}

pub(crate) fn duplicate_email_on_constraint(error: Error) -> Error {
    match error {
        Error::Storage(StorageError::Constraint(_)) => AuthError::DuplicateEmail.into(),
        other => other,
    }
}

/// Administrative account management.
pub struct AccountService<A: AccountRepository> {
    accounts: Arc<A>,
}

impl<A: AccountRepository> AccountService<A> {
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    pub async fn list(&self) -> Result<Vec<Account>, Error> {
        self.accounts.list().await
    }

    pub async fn get(&self, id: AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound("User").into())
    }

    /// Create an account without signing it in.
    pub async fn create(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Account, Error> {
        let account = insert_account(self.accounts.as_ref(), full_name, email, password, role).await?;
        tracing::info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    pub async fn update(&self, id: AccountId, update: AccountUpdate) -> Result<Account, Error> {
        let mut account = self.get(id).await?;

        if let Some(email) = update.email.as_deref() {
            if email != account.email {
                validate_email(email)?;
                if self.accounts.find_by_email(email).await?.is_some() {
                    return Err(AuthError::DuplicateEmail.into());
                }
            }
        }

        account.apply(update);
        let account = self
            .accounts
            .update(&account)
            .await
            .map_err(duplicate_email_on_constraint)?;

        tracing::debug!(account_id = %account.id, "Account updated");
        Ok(account)
    }

    pub async fn delete(&self, id: AccountId) -> Result<(), Error> {
        if !self.accounts.delete(id).await? {
            return Err(StorageError::NotFound("User").into());
        }
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}
