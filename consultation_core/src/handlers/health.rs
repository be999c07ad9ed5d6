use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let mut health_info = json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "timestamp": chrono::Utc::now().timestamp(),
        "mail_transport": state.consultation_service.mail_transport(),
    });

    let mut status_code = StatusCode::OK;

    if let Some(db_manager) = &state.db_manager {
        match db_manager.health_check().await {
            Ok(_) => {
                health_info["database_status"] = json!("healthy");
            }
            Err(e) => {
                warn!("Health check: database unavailable: {}", e);
                health_info["status"] = json!("unhealthy");
                health_info["database_status"] = json!("unhealthy");
                status_code = StatusCode::SERVICE_UNAVAILABLE;
            }
        }
    }

    (status_code, Json(health_info))
}
