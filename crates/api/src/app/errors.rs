//! Consistent JSON error responses.
//!
//! The internal failure taxonomy is preserved as stable `error` codes, while
//! messages stay generic at the HTTP boundary (no internal detail leaks).

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use wicket_auth::{DenyReason, TokenError};
use wicket_core::DomainError;
use wicket_infra::StoreError;

use crate::app::services::{LoginError, ServiceError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn token_error_to_response(err: TokenError) -> axum::response::Response {
    let code = match err {
        TokenError::Malformed => "token_malformed",
        TokenError::SignatureInvalid => "token_invalid",
        TokenError::Expired => "token_expired",
    };
    json_error(StatusCode::UNAUTHORIZED, code, "authentication required")
}

pub fn deny_to_response(reason: DenyReason) -> axum::response::Response {
    match reason {
        DenyReason::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        DenyReason::Forbidden => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient role")
        }
    }
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        // Lookup miss and password mismatch are deliberately the same
        // response, so usernames cannot be enumerated through login.
        LoginError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid username or password",
        ),
        LoginError::Inactive => json_error(
            StatusCode::UNAUTHORIZED,
            "inactive_user",
            "account is deactivated",
        ),
        LoginError::Store(e) => internal(e),
        LoginError::Hash(e) => internal(e),
        LoginError::Sign(e) => internal(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
    }
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(StoreError::Duplicate(field)) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("{field} already exists"),
        ),
        ServiceError::Store(e) => internal(e),
        ServiceError::Hash(e) => internal(e),
    }
}

/// Unexpected faults are fatal to the request (500), never to the process,
/// and never expose internals.
fn internal(err: impl std::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %err, "internal error");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}
