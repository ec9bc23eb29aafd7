//! Credential & session guard
//!
//! The guard is the only component that reads or writes credential state. It
//! verifies email/password pairs, enforces the lockout policy, issues session
//! tokens and resolves presented tokens back to callers.
//!
//! ```rust,ignore
//! let guard = CredentialGuard::new(accounts, sessions, LockoutConfig::default());
//!
//! let session = guard.register("Alice", "alice@example.com", "hunter2", None).await?;
//! let session = guard.authenticate("alice@example.com", "hunter2").await?;
//!
//! let header = format!("Bearer {}", session.access_token.as_str());
//! let user = guard.resolve_caller(Some(&header)).await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::{
    Error,
    account::AccountView,
    crypto::{prepare_dummy_hash, verify_dummy_password, verify_password},
    error::{AuthError, SessionError},
    repositories::AccountRepository,
    services::{
        account::insert_account,
        lockout::{LockStatus, LockoutConfig},
    },
    session::{Caller, JwtSessionProvider, SessionToken, parse_bearer},
    validation::require_non_empty,
};

/// A freshly issued token together with the account it was issued for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: SessionToken,
    pub user: AccountView,
}

pub struct CredentialGuard<A: AccountRepository> {
    accounts: Arc<A>,
    sessions: JwtSessionProvider,
    lockout: LockoutConfig,
}

impl<A: AccountRepository> CredentialGuard<A> {
    pub fn new(accounts: Arc<A>, sessions: JwtSessionProvider, lockout: LockoutConfig) -> Self {
        prepare_dummy_hash();
        Self {
            accounts,
            sessions,
            lockout,
        }
    }

    pub fn lockout_config(&self) -> &LockoutConfig {
        &self.lockout
    }

    /// Verify an email/password pair and open a session.
    ///
    /// A locked account is rejected before the password is looked at and
    /// without touching its counter. Otherwise the account is written exactly
    /// once: either the failure is counted or the counter and lock are reset.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, Error> {
        require_non_empty(email, "Email")?;
        require_non_empty(password, "Password")?;

        let Some(mut account) = self.accounts.find_by_email(email).await? else {
            verify_dummy_password(password);
            tracing::warn!("Sign-in attempt for unknown email");
            return Err(AuthError::unknown_account().into());
        };

        let now = Utc::now();
        if let LockStatus::LockedUntil(lock_until) = LockStatus::of(&account, now) {
            tracing::warn!(
                account_id = %account.id,
                lock_until = %lock_until,
                "Sign-in attempt on locked account"
            );
            return Err(AuthError::AccountLocked { lock_until }.into());
        }

        if !verify_password(password, &account.password_hash) {
            let account_locked = self.lockout.record_failure(&mut account, now);
            let account = self.accounts.update(&account).await?;

            tracing::warn!(
                account_id = %account.id,
                failed_attempts = account.failed_login_attempts,
                account_locked,
                "Sign-in failed: wrong password"
            );
            return Err(AuthError::InvalidCredentials {
                failed_attempts: Some(account.failed_login_attempts),
                account_locked,
            }
            .into());
        }

        self.lockout.record_success(&mut account, now);
        let account = self.accounts.update(&account).await?;
        let access_token = self.sessions.issue(&account)?;

        tracing::info!(account_id = %account.id, "Sign-in succeeded");
        Ok(AuthSession {
            access_token,
            user: account.view(),
        })
    }

    /// Create an account and open a session for it.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<AuthSession, Error> {
        let account = insert_account(self.accounts.as_ref(), full_name, email, password, role).await?;
        let access_token = self.sessions.issue(&account)?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account registered");
        Ok(AuthSession {
            access_token,
            user: account.view(),
        })
    }

    /// Check a bearer header's token without looking the account up.
    pub fn verify_token(&self, authorization: Option<&str>) -> Result<Caller, Error> {
        let token = parse_bearer(authorization)?;
        let claims = self.sessions.verify(&token).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
        })?;
        Ok(Caller::from(&claims))
    }

    /// Resolve a bearer header to the account it was issued for.
    ///
    /// Lock state is not re-checked: a token stays usable until it expires.
    pub async fn resolve_caller(&self, authorization: Option<&str>) -> Result<AccountView, Error> {
        let caller = self.verify_token(authorization)?;

        match self.accounts.find_by_id(caller.account_id).await? {
            Some(account) => Ok(account.view()),
            None => {
                tracing::debug!(account_id = %caller.account_id, "Token names a deleted account");
                Err(SessionError::UnknownAccount.into())
            }
        }
    }
}
