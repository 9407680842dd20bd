use wicket_auth::{Claims, Role};
use wicket_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted into request extensions by the guard middleware after a granted
/// access decision; guaranteed present for every non-public handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    claims: Claims,
}

impl CurrentUser {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn role(&self) -> Option<Role> {
        self.claims.role()
    }
}
