//! Route access policy registry.
//!
//! An explicit, queryable mapping from route identifier (method + route
//! pattern) to access requirement, built once at startup and consulted by the
//! guard middleware on every request. Resolution is closest-declaration-wins:
//! a route entry beats a scope prefix, a longer scope prefix beats a shorter
//! one, and anything undeclared falls back to authenticated-only
//! (fail-closed).

use std::collections::HashMap;

use axum::http::Method;

use wicket_auth::AccessRequirement;

pub struct AccessPolicy {
    routes: HashMap<(Method, String), AccessRequirement>,
    scopes: Vec<(String, AccessRequirement)>,
    fallback: AccessRequirement,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            scopes: Vec::new(),
            fallback: AccessRequirement::AuthenticatedOnly,
        }
    }

    /// Declare the requirement for a single route. `pattern` is the path as
    /// registered with the router (e.g. `/api/users/details/:username`).
    pub fn route(mut self, method: Method, pattern: &str, requirement: AccessRequirement) -> Self {
        self.routes
            .insert((method, pattern.to_string()), requirement);
        self
    }

    /// Declare a default for every route under a path prefix.
    pub fn scope(mut self, prefix: &str, requirement: AccessRequirement) -> Self {
        self.scopes.push((prefix.to_string(), requirement));
        // Longest prefix first, so the closest declaration wins.
        self.scopes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    /// Resolve the requirement for a matched route.
    pub fn requirement_for(&self, method: &Method, pattern: &str) -> &AccessRequirement {
        if let Some(requirement) = self.routes.get(&(method.clone(), pattern.to_string())) {
            return requirement;
        }
        self.scopes
            .iter()
            .find(|(prefix, _)| pattern.starts_with(prefix.as_str()))
            .map(|(_, requirement)| requirement)
            .unwrap_or(&self.fallback)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_auth::Role;

    fn policy() -> AccessPolicy {
        AccessPolicy::new()
            .scope("/api", AccessRequirement::AuthenticatedOnly)
            .route(Method::POST, "/api/auth/login", AccessRequirement::Public)
            .route(
                Method::GET,
                "/api/users",
                AccessRequirement::roles([Role::Admin]),
            )
    }

    #[test]
    fn route_declaration_beats_scope() {
        let p = policy();
        assert_eq!(
            p.requirement_for(&Method::POST, "/api/auth/login"),
            &AccessRequirement::Public
        );
        assert_eq!(
            p.requirement_for(&Method::GET, "/api/users"),
            &AccessRequirement::roles([Role::Admin])
        );
    }

    #[test]
    fn route_declarations_are_method_specific() {
        let p = policy();
        // Same path, different method: the scope default applies.
        assert_eq!(
            p.requirement_for(&Method::GET, "/api/auth/login"),
            &AccessRequirement::AuthenticatedOnly
        );
    }

    #[test]
    fn scope_beats_global_fallback_and_longest_prefix_wins() {
        let p = AccessPolicy::new()
            .scope("/api", AccessRequirement::AuthenticatedOnly)
            .scope("/api/public", AccessRequirement::Public);

        assert_eq!(
            p.requirement_for(&Method::GET, "/api/public/docs"),
            &AccessRequirement::Public
        );
        assert_eq!(
            p.requirement_for(&Method::GET, "/api/users/details"),
            &AccessRequirement::AuthenticatedOnly
        );
    }

    #[test]
    fn undeclared_routes_fail_closed() {
        let p = policy();
        assert_eq!(
            p.requirement_for(&Method::GET, "/metrics"),
            &AccessRequirement::AuthenticatedOnly
        );
        // Even the empty pattern (no route matched) stays closed.
        assert_eq!(
            p.requirement_for(&Method::GET, ""),
            &AccessRequirement::AuthenticatedOnly
        );
    }
}
