//! Password hashing
//!
//! Hashes are PHC strings produced by `password-auth` (Argon2 with fixed
//! parameters and a fresh random salt per call). Verification is constant-time
//! and reads the salt and parameters back out of the stored string.

use std::sync::LazyLock;

use rand::{TryRngCore, rngs::OsRng};

use crate::{Error, error::CryptoError};

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> String {
    password_auth::generate_hash(password)
}

/// Check a plaintext password against a stored hash.
///
/// A stored value that is not a parseable PHC string never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    password_auth::verify_password(password, hash).is_ok()
}

/// Hash checked in place of a stored one when the email has no account.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| password_auth::generate_hash("timeline-no-such-account"));

/// Compute the dummy hash now rather than on the first unknown-email sign-in.
pub fn prepare_dummy_hash() {
    LazyLock::force(&DUMMY_HASH);
}

/// Run a full verification against the dummy hash and discard the result.
///
/// Costs the same Argon2 work as checking a wrong password.
pub fn verify_dummy_password(password: &str) {
    let _ = password_auth::verify_password(password, &DUMMY_HASH);
}

/// Generate a random 256-bit signing secret.
pub fn generate_secret() -> Result<Vec<u8>, Error> {
    let mut bytes = vec![0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::RandomGeneration(format!("OS RNG failure: {e}")))?;
    Ok(bytes)
}
