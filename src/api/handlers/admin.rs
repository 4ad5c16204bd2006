use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;
use crate::services::processing::ProcessingService;

pub async fn admin_process(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(expected) = state.config.server.admin_token.as_deref() else {
        return (StatusCode::FORBIDDEN, "Admin endpoint disabled").into_response();
    };

    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    if auth_header != Some(format!("Bearer {}", expected).as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let Some(guard) = state.try_begin_pass() else {
        return (StatusCode::CONFLICT, "Processing already running").into_response();
    };

    tokio::task::spawn_blocking(move || {
        let state = Arc::clone(&guard.state);
        log::info!("Admin triggered processing started");
        let result = state
            .pool
            .get()
            .map_err(anyhow::Error::from)
            .and_then(|mut conn| ProcessingService::new(state.config.clone()).process(&mut conn));

        match result {
            Ok(report) => log::info!(
                "Admin triggered processing completed: {} class change(s)",
                report.changes.len()
            ),
            Err(e) => log::error!("Admin triggered processing failed: {:?}", e),
        }
        drop(guard);
    });

    (StatusCode::ACCEPTED, "Processing triggered").into_response()
}
