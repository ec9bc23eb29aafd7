use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password.
    ///
    /// `failed_attempts` is only populated when the account exists and the
    /// failure was recorded against it.
    #[error("Invalid credentials")]
    InvalidCredentials {
        failed_attempts: Option<u32>,
        account_locked: bool,
    },

    #[error("Account is locked until {lock_until}")]
    AccountLocked { lock_until: DateTime<Utc> },

    #[error("Email already in use")]
    DuplicateEmail,
}

impl AuthError {
    /// Failure for an email that has no account behind it.
    pub fn unknown_account() -> Self {
        AuthError::InvalidCredentials {
            failed_attempts: None,
            account_locked: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Missing `Authorization` header or a header without the bearer prefix.
    #[error("No token provided")]
    Unauthenticated,

    /// The token is valid but the account it names is gone.
    #[error("Account not found for token")]
    UnknownAccount,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("JWT signing failed: {0}")]
    JwtSigning(String),

    #[error("Random number generation failed: {0}")]
    RandomGeneration(String),
}

impl Error {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Errors a caller sees as "not authenticated": missing, malformed,
    /// expired or forged tokens and tokens naming a deleted account.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Storage(StorageError::NotFound(_)))
    }

    /// Store and crypto failures that must never be shown to a client.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Crypto(_)
                | Error::Storage(StorageError::Database(_))
                | Error::Storage(StorageError::Migration(_))
                | Error::Storage(StorageError::Connection(_))
                | Error::Storage(StorageError::Constraint(_))
        )
    }
}
