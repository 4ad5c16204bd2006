use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{query_error, venue_name, AppState, ShooterParams};
use crate::api::models::{AchievementEntry, HistoryEntry, PaginatedResponse, ShooterDetail, ShooterListItem};
use crate::classification::{eligible_sequence, Classification};
use crate::database::{self, ShooterFilter};

pub async fn get_shooters(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShooterParams>,
) -> impl IntoResponse {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(50).clamp(1, 500);
    let Some(offset) = page_offset(page, page_size) else {
        return (StatusCode::BAD_REQUEST, "page is out of range").into_response();
    };

    let classification = match params.classification.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<Classification>() {
            Ok(class) => Some(class),
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        },
    };

    let conn = match state.connection() {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let filter = ShooterFilter {
        name_contains: params.filter.filter(|f| !f.trim().is_empty()),
        classification,
        members_only: params.members_only.unwrap_or(false),
        limit: page_size,
        offset,
    };

    let (rows, total) = match database::shooters::list_standings(&conn, &filter) {
        Ok(result) => result,
        Err(e) => return query_error(e),
    };

    let items = rows
        .into_iter()
        .enumerate()
        .map(|(i, shooter)| ShooterListItem {
            rank: offset + i + 1,
            shooter_id: shooter.id,
            active_member: shooter.is_numbered_member(),
            classification: shooter.classification.to_string(),
            wyco_points: shooter.wyco_points,
            wyco_number: shooter.wyco_number,
            name: shooter.name,
        })
        .collect();

    Json(PaginatedResponse {
        items,
        total,
        page,
        page_size,
    })
    .into_response()
}

/// Row offset of a page, kept within what SQLite accepts for OFFSET.
fn page_offset(page: usize, page_size: usize) -> Option<usize> {
    let offset = (page - 1).checked_mul(page_size)?;
    let end = offset.checked_add(page_size)?;
    (end <= i64::MAX as usize).then_some(offset)
}

pub async fn get_shooter_detail(
    State(state): State<Arc<AppState>>,
    Path(shooter_id): Path<i64>,
) -> impl IntoResponse {
    let conn = match state.connection() {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let shooter = match database::shooters::find_by_id(&conn, shooter_id) {
        Ok(Some(shooter)) => shooter,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return query_error(e),
    };

    let rows = match database::scores::history_rows(&conn, shooter_id) {
        Ok(rows) => rows,
        Err(e) => return query_error(e),
    };

    let achievements = match database::achievements::list_for_shooter(&conn, shooter_id) {
        Ok(rows) => rows
            .into_iter()
            .map(|a| AchievementEntry {
                name: a.achievement.to_string(),
                match_id: a.match_id,
                match_name: a.match_name,
                match_date: a.match_date.to_string(),
            })
            .collect(),
        Err(e) => return query_error(e),
    };

    let eligible_scores = eligible_sequence(rows.iter().map(|r| r.wyco_points)).len();
    let history: Vec<HistoryEntry> = rows
        .into_iter()
        .map(|r| HistoryEntry {
            match_id: r.match_id,
            match_name: r.match_name,
            match_date: r.match_date.to_string(),
            venue: venue_name(r.venue_id),
            place: r.place,
            points: r.points,
            wyco_points: r.wyco_points,
        })
        .collect();

    Json(ShooterDetail {
        shooter_id: shooter.id,
        active_member: shooter.is_numbered_member(),
        classification: shooter.classification.to_string(),
        wyco_points: shooter.wyco_points,
        wyco_number: shooter.wyco_number,
        name: shooter.name,
        matches_shot: history.len(),
        eligible_scores,
        history,
        achievements,
    })
    .into_response()
}
