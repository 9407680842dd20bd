use std::sync::Arc;
use std::time::Duration;

use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;

use crate::app::services::AppServices;

pub async fn root() -> &'static str {
    "Wicket API"
}

/// GET /healthcheck - liveness plus human-readable process uptime.
pub async fn healthcheck(
    Extension(services): Extension<Arc<AppServices>>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Server is running",
        "uptime": format_uptime(services.uptime()),
    }))
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}hrs {}mins {}secs", secs / 3600, (secs % 3600) / 60, secs % 60)
}
