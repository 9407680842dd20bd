//! Request pipeline guard.
//!
//! Intercepts every inbound request before its handler: resolves the route's
//! access requirement, validates the bearer token when one is needed, runs the
//! access decision, and attaches the authenticated identity to the request.
//! Per-request ordering is strictly decode → decide → handle.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use wicket_auth::{AccessDecision, AccessRequirement, TokenValidator, decide};

use crate::app::errors;
use crate::context::CurrentUser;
use crate::policy::AccessPolicy;

#[derive(Clone)]
pub struct GuardState {
    pub policy: Arc<AccessPolicy>,
    pub tokens: Arc<dyn TokenValidator>,
}

pub async fn access_guard(
    State(state): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // A request that somehow matched no pattern resolves through the
    // registry's fail-closed fallback.
    let pattern = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let requirement = state.policy.requirement_for(req.method(), &pattern);

    // Public routes skip token parsing entirely.
    if matches!(requirement, AccessRequirement::Public) {
        return next.run(req).await;
    }

    // A missing Authorization header is identity-absent, not a parse failure;
    // a token that is present must verify.
    let identity = match bearer_token(req.headers()) {
        None => None,
        Some(token) => match state.tokens.validate(token, Utc::now()) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(%pattern, category = %e, "token rejected");
                return errors::token_error_to_response(e);
            }
        },
    };

    match decide(requirement, identity.as_ref()) {
        AccessDecision::Granted => {
            if let Some(claims) = identity {
                req.extensions_mut().insert(CurrentUser::new(claims));
            }
            next.run(req).await
        }
        AccessDecision::Denied(reason) => {
            tracing::debug!(%pattern, ?reason, "access denied");
            errors::deny_to_response(reason)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
