//! Access decision engine.
//!
//! Collapses "is there an identity?" and "does the role suffice?" into a
//! single state machine so ordering and defaults are unambiguous and testable
//! without a web framework.

use crate::claims::Claims;
use crate::roles::Role;

/// Access requirement attached to a route at registration time. Static,
/// read-only at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequirement {
    /// No authentication; token parsing must be skipped entirely.
    Public,
    /// Any verified identity.
    AuthenticatedOnly,
    /// A verified identity whose role is in the set.
    RequiresRoles(Vec<Role>),
}

impl AccessRequirement {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::RequiresRoles(roles.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No identity where one is required (HTTP 401).
    Unauthenticated,
    /// Identity present but role insufficient (HTTP 403).
    Forbidden,
}

/// Decide whether `identity` may access a route with `requirement`.
///
/// - No IO
/// - No panics
/// - Pure function of its inputs
pub fn decide(requirement: &AccessRequirement, identity: Option<&Claims>) -> AccessDecision {
    match requirement {
        AccessRequirement::Public => AccessDecision::Granted,

        AccessRequirement::AuthenticatedOnly => match identity {
            Some(_) => AccessDecision::Granted,
            None => AccessDecision::Denied(DenyReason::Unauthenticated),
        },

        AccessRequirement::RequiresRoles(allowed) => {
            let Some(claims) = identity else {
                return AccessDecision::Denied(DenyReason::Unauthenticated);
            };
            match claims.role() {
                Some(role) if allowed.contains(&role) => AccessDecision::Granted,
                // An identity with no (or an unknown) role id is
                // authenticated but never role-authorized.
                _ => AccessDecision::Denied(DenyReason::Forbidden),
            }
        }
    }
}
