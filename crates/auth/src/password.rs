//! Password hashing and verification (Argon2id, PHC string format).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

/// Cost settings applied when creating new hashes.
///
/// Verification always honors the parameters embedded in the stored hash
/// string, so changing the cost never invalidates existing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Argon2 iteration count (t-cost).
    pub iterations: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    /// The stored hash is not a parseable PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// The hashing backend failed (never a mismatch).
    #[error("password hashing failed")]
    Backend,
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str, cost: HashCost) -> Result<String, HashError> {
    let params = Params::new(
        Params::DEFAULT_M_COST,
        cost.iterations,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(|_| HashError::Backend)?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|_| HashError::Backend)?
        .to_string())
}

/// Verify `plain` against a stored PHC-format hash in constant time.
///
/// A mismatch is `Ok(false)`, not an error; errors are reserved for broken
/// hashes and backend faults.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| HashError::MalformedHash)?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(HashError::Backend),
    }
}
