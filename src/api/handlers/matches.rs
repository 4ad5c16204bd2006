use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{query_error, venue_name, AppState};
use crate::api::models::{MatchListItem, MatchResultItem, MatchScoresResponse};
use crate::database;

pub async fn get_matches(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let conn = match state.connection() {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let matches = match database::matches::list_all(&conn) {
        Ok(matches) => matches,
        Err(e) => return query_error(e),
    };

    let items: Vec<MatchListItem> = matches
        .into_iter()
        .map(|m| MatchListItem {
            match_id: m.id,
            date: m.date.to_string(),
            venue: venue_name(m.venue_id),
            name: m.name,
        })
        .collect();

    Json(items).into_response()
}

pub async fn get_match_scores(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
) -> impl IntoResponse {
    let conn = match state.connection() {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let stored = match database::matches::find_by_id(&conn, match_id) {
        Ok(Some(m)) => m,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return query_error(e),
    };

    let results = match database::scores::match_results(&conn, match_id) {
        Ok(rows) => rows,
        Err(e) => return query_error(e),
    };

    Json(MatchScoresResponse {
        match_id: stored.id,
        date: stored.date.to_string(),
        venue: venue_name(stored.venue_id),
        name: stored.name,
        results: results
            .into_iter()
            .map(|r| MatchResultItem {
                place: r.place,
                shooter_id: r.shooter_id,
                name: r.shooter_name,
                classification: r.classification.to_string(),
                percentage: r.percentage,
                points: r.points,
                wyco_points: r.wyco_points,
            })
            .collect(),
    })
    .into_response()
}
