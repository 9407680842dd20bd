//! HS256 token issuance and validation.
//!
//! Tokens are stateless: validity is entirely determined by signature and
//! expiry, never by server memory. Nothing is persisted at issuance and no
//! validation result is cached across requests.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::claims::{Claims, Identity, TokenError, validate_claims};

/// Validation seam used by the request guard, so the pipeline depends on the
/// contract rather than on a concrete key type.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

#[derive(Debug, Error)]
#[error("token signing failed")]
pub struct SignError(#[source] jsonwebtoken::errors::Error);

/// HMAC-SHA256 signer/verifier over the process-wide secret.
///
/// The secret is read-only after construction; issuance is deterministic for
/// a fixed (identity, now, secret) triple.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `validate_claims` against an injectable clock,
        // not against the process clock hidden inside the decoder.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a signed token for `identity`, valid for `ttl` starting at `now`.
    pub fn issue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, SignError> {
        let claims = Claims {
            sub: identity.user_id,
            username: identity.username.clone(),
            role_id: identity.role_id,
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(SignError)
    }
}

impl TokenValidator for Hs256TokenService {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // Structural check before any cryptography.
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed);
        }

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
