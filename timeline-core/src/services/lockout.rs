//! Account lockout after repeated failed sign-ins.
//!
//! The failure counter and lock expiry live on the account record itself. Lock
//! state is never stored as a flag; it is derived from `lock_until` against the
//! current time, so a lock lapses without any cleanup job.

use chrono::{DateTime, Duration, Utc};

use crate::account::Account;

/// Lockout policy.
#[derive(Debug, Clone)]
pub struct LockoutConfig {
    /// Consecutive failures that lock the account
    pub max_failed_attempts: u32,
    /// How long a lock lasts once applied
    pub lockout_period: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_period: Duration::minutes(15),
        }
    }
}

/// Lock state of an account at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    LockedUntil(DateTime<Utc>),
}

impl LockStatus {
    pub fn of(account: &Account, now: DateTime<Utc>) -> Self {
        match account.lock_until {
            Some(lock_until) if lock_until > now => LockStatus::LockedUntil(lock_until),
            _ => LockStatus::Unlocked,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, LockStatus::LockedUntil(_))
    }
}

impl LockoutConfig {
    /// Count a failed attempt against `account`, locking it when the counter
    /// reaches the threshold. Returns whether the account is now locked.
    pub fn record_failure(&self, account: &mut Account, now: DateTime<Utc>) -> bool {
        account.failed_login_attempts = account.failed_login_attempts.saturating_add(1);
        if account.failed_login_attempts >= self.max_failed_attempts {
            account.lock_until = Some(now + self.lockout_period);
            true
        } else {
            account.lock_until = None;
            false
        }
    }

    /// Reset lockout state after a successful sign-in.
    pub fn record_success(&self, account: &mut Account, now: DateTime<Utc>) {
        account.failed_login_attempts = 0;
        account.lock_until = None;
        account.last_login = Some(now);
    }
}
