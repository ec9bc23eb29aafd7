//! Stateless JWT sessions
//!
//! A session is nothing more than a signed token carrying the account id and
//! role. Tokens are never persisted, so there is nothing to revoke: expiry is
//! the only way a token stops working.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{Account, AccountId, Role},
    crypto::generate_secret,
    error::{CryptoError, SessionError},
};

const BEARER_PREFIX: &str = "Bearer ";

/// An encoded session token as handed to and received from clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: &str) -> Self {
        SessionToken(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(rename = "accountId")]
    pub account_id: AccountId,
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Signing configuration for session tokens (HS256).
#[derive(Clone)]
pub struct JwtConfig {
    secret_key: Vec<u8>,
    /// Issuer claim, set on issue and required on verify when present
    pub issuer: Option<String>,
}

impl JwtConfig {
    /// Create a new JWT configuration with HS256 algorithm
    pub fn new_hs256(secret_key: Vec<u8>) -> Self {
        Self {
            secret_key,
            issuer: None,
        }
    }

    /// Create a configuration with a freshly generated secret.
    ///
    /// Tokens signed with it stop verifying once the process exits.
    pub fn new_random_hs256() -> Result<Self, Error> {
        Ok(Self::new_hs256(generate_secret()?))
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret_key)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret_key)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock skew tolerance on `exp`
        validation.leeway = 0;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Token lifetime policy.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub expires_in: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expires_in: Duration::days(7),
        }
    }
}

impl SessionConfig {
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }
}

/// Identity recovered from a verified token, without a store lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub account_id: AccountId,
    pub role: Role,
}

impl From<&JwtClaims> for Caller {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            account_id: claims.account_id,
            role: claims.role,
        }
    }
}

/// Issues and verifies session tokens.
#[derive(Debug, Clone)]
pub struct JwtSessionProvider {
    config: JwtConfig,
    session_config: SessionConfig,
}

impl JwtSessionProvider {
    pub fn new(config: JwtConfig, session_config: SessionConfig) -> Self {
        Self {
            config,
            session_config,
        }
    }

    /// Issue a token for `account`, valid for the configured lifetime.
    pub fn issue(&self, account: &Account) -> Result<SessionToken, Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            account_id: account.id,
            role: account.role,
            iat: now.timestamp(),
            exp: (now + self.session_config.expires_in).timestamp(),
            iss: self.config.issuer.clone(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims with the configured key.
    pub fn sign(&self, claims: &JwtClaims) -> Result<SessionToken, Error> {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.config.encoding_key(),
        )
        .map_err(|e| CryptoError::JwtSigning(format!("Failed to encode JWT: {e}")))?;

        Ok(SessionToken(token))
    }

    /// Check signature, expiry and issuer, returning the claims.
    pub fn verify(&self, token: &SessionToken) -> Result<JwtClaims, Error> {
        let token_data = decode::<JwtClaims>(
            token.as_str(),
            &self.config.decoding_key(),
            &self.config.validation(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::InvalidToken(format!("JWT validation failed: {e}")),
        })?;

        Ok(token_data.claims)
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Only the exact `Bearer ` prefix is accepted and the token after it must not
/// be empty.
pub fn parse_bearer(header: Option<&str>) -> Result<SessionToken, Error> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .map(SessionToken::new)
        .ok_or_else(|| SessionError::Unauthenticated.into())
}
