//! User directory routes: registration plus role-gated administration.
//!
//! Role enforcement happens in the guard middleware (see the access policy in
//! `routes::policy`); handlers only implement behavior on top of an already
//! authorized request.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::app::dto::{RegisterUserRequest, SafeUser, UpdateUserRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

/// POST /api/users/register
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterUserRequest>,
) -> axum::response::Response {
    match services.register(body).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(SafeUser::from_record(record)),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /api/users - list the sub-admin directory.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_sub_admins().await {
        Ok(records) => {
            let items: Vec<SafeUser> = records.into_iter().map(SafeUser::from_record).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /api/users/details - the authenticated user's own record.
pub async fn own_details(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.get_user(current.username()).await {
        Ok(record) => (StatusCode::OK, Json(SafeUser::from_record(record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /api/users/details/:username - admin lookup (sub-admins only).
pub async fn user_details(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    match services.get_sub_admin(&username).await {
        Ok(record) => (StatusCode::OK, Json(SafeUser::from_record(record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// PATCH /api/users/update - update the authenticated user's own record.
pub async fn update_own(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<UpdateUserRequest>,
) -> axum::response::Response {
    match services.update_user(current.username(), body).await {
        Ok(record) => (StatusCode::OK, Json(SafeUser::from_record(record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// PATCH /api/users/update/:username
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> axum::response::Response {
    match services.update_user(&username, body).await {
        Ok(record) => (StatusCode::OK, Json(SafeUser::from_record(record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// PATCH /api/users/activate/:username
pub async fn activate_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    set_active(services, &username, true).await
}

/// PATCH /api/users/deactivate/:username
pub async fn deactivate_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    set_active(services, &username, false).await
}

async fn set_active(
    services: Arc<AppServices>,
    username: &str,
    active: bool,
) -> axum::response::Response {
    match services.set_active(username, active).await {
        Ok(record) => (StatusCode::OK, Json(SafeUser::from_record(record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// DELETE /api/users/delete/:username - soft delete.
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    match services.delete_user(&username).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "username": username, "deleted": true })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
