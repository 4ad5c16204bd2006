use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::config::venues;
use crate::database::{DbConn, DbPool};

pub mod admin;
pub mod matches;
pub mod shooters;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pass_running: AtomicBool,
}

/// Held for the lifetime of a background processing pass.
pub struct PassGuard {
    state: Arc<AppState>,
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        self.state.pass_running.store(false, Ordering::Release);
    }
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            pool,
            config,
            pass_running: AtomicBool::new(false),
        }
    }

    /// `None` while another pass still holds the store.
    pub fn try_begin_pass(self: &Arc<Self>) -> Option<PassGuard> {
        self.pass_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard {
                state: Arc::clone(self),
            })
    }

    fn connection(&self) -> Result<DbConn, Response> {
        self.pool
            .get()
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response())
    }
}

#[derive(Deserialize, Default)]
pub struct ShooterParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub classification: Option<String>,
    pub filter: Option<String>,
    pub members_only: Option<bool>,
}

fn query_error(e: anyhow::Error) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response()
}

fn venue_name(venue_id: Option<i64>) -> Option<String> {
    venue_id.map(|id| {
        venues::find_by_id(id)
            .map(|v| v.name.to_string())
            .unwrap_or_else(|| format!("Venue {}", id))
    })
}
