use axum::Router;
use axum::http::Method;
use axum::routing::{delete, get, patch, post};

use wicket_auth::{AccessRequirement, Role};

use crate::policy::AccessPolicy;

pub mod auth;
pub mod system;
pub mod users;

/// Full route table.
///
/// Patterns here must line up one-for-one with `policy()`: the guard resolves
/// each request's requirement from the registry by the matched pattern.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/healthcheck", get(system::healthcheck))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users/register", post(users::register))
        .route("/api/users", get(users::list_users))
        .route("/api/users/details", get(users::own_details))
        .route("/api/users/details/:username", get(users::user_details))
        .route("/api/users/update", patch(users::update_own))
        .route("/api/users/update/:username", patch(users::update_user))
        .route("/api/users/activate/:username", patch(users::activate_user))
        .route("/api/users/deactivate/:username", patch(users::deactivate_user))
        .route("/api/users/delete/:username", delete(users::delete_user))
}

/// Access requirements for the route table.
///
/// Closest declaration wins: per-route entries override the `/api` scope, and
/// the registry itself falls back to authenticated-only for anything
/// undeclared.
pub fn policy() -> AccessPolicy {
    let admin = || AccessRequirement::roles([Role::Admin]);
    let any_role = || AccessRequirement::roles([Role::Admin, Role::SubAdmin]);

    AccessPolicy::new()
        .scope("/api", AccessRequirement::AuthenticatedOnly)
        .route(Method::GET, "/", AccessRequirement::Public)
        .route(Method::GET, "/healthcheck", AccessRequirement::Public)
        .route(Method::POST, "/api/auth/login", AccessRequirement::Public)
        .route(Method::POST, "/api/users/register", AccessRequirement::Public)
        .route(Method::GET, "/api/users", admin())
        .route(Method::GET, "/api/users/details", any_role())
        .route(Method::GET, "/api/users/details/:username", admin())
        .route(Method::PATCH, "/api/users/update", any_role())
        .route(Method::PATCH, "/api/users/update/:username", admin())
        .route(Method::PATCH, "/api/users/activate/:username", admin())
        .route(Method::PATCH, "/api/users/deactivate/:username", admin())
        .route(Method::DELETE, "/api/users/delete/:username", admin())
}
