//! HTTP API application wiring (Axum router + service wiring).
//!
//! If you're new to Rust, this folder is structured like:
//! - `services.rs`: store selection + the login/user-directory services
//! - `routes/`: HTTP routes + handlers (and their access policy)
//! - `dto.rs`: request DTOs, validation, and the safe user projection
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(config: Config) -> anyhow::Result<Router> {
    let services = Arc::new(services::AppServices::build(&config).await?);

    let guard_state = middleware::GuardState {
        policy: Arc::new(routes::policy()),
        tokens: services.token_validator(),
    };

    // The guard layer is added last so it runs before everything else on the
    // way in; public routes short-circuit inside it.
    Ok(routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            guard_state,
            middleware::access_guard,
        )))
}
