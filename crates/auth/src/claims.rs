use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wicket_core::UserId;

use crate::roles::Role;

/// Identity subset produced by credential verification and encoded into a
/// token. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub role_id: Option<i16>,
}

/// JWT claims model (transport-agnostic).
///
/// This is the only source of identity for a request once the token has been
/// verified; nothing in here is trusted before signature + expiry checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: UserId,

    /// Username at issuance time.
    pub username: String,

    /// Stored role id; absent when the account has no role assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i16>,

    /// Issued-at timestamp (UNIX seconds).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp (UNIX seconds).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl Claims {
    /// Resolve the claimed role id against the closed role set.
    pub fn role(&self) -> Option<Role> {
        self.role_id.and_then(Role::from_id)
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub,
            username: self.username.clone(),
            role_id: self.role_id,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Token is structurally invalid (shape, encoding, claim types, or a
    /// nonsensical time window).
    #[error("malformed token")]
    Malformed,

    /// Signature did not verify. Deliberately a single category; callers must
    /// not learn more than this.
    #[error("invalid token signature")]
    SignatureInvalid,

    /// Token was valid once but its expiry has passed.
    #[error("token has expired")]
    Expired,
}

/// Deterministically validate the claims time window.
///
/// Note: this validates the *claims* only, against a caller-supplied clock so
/// tests can freeze time. Signature verification happens in the token layer
/// before this runs.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::Malformed);
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
