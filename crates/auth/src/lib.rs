//! `wicket-auth` — pure authentication/authorization core (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod access;
pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use access::{AccessDecision, AccessRequirement, DenyReason, decide};
pub use claims::{Claims, Identity, TokenError, validate_claims};
pub use password::{HashCost, HashError, hash_password, verify_password};
pub use roles::Role;
pub use token::{Hs256TokenService, SignError, TokenValidator};
