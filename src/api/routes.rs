use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_process,
    matches::{get_match_scores, get_matches},
    shooters::{get_shooter_detail, get_shooters},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/shooters", get(get_shooters))
        .route("/api/shooters/:id", get(get_shooter_detail))
        .route("/api/matches", get(get_matches))
        .route("/api/matches/:id/scores", get(get_match_scores))
        .route("/api/admin/process", post(admin_process))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::classification::{Achievement, Award, Classification, OVERALL_STAGE};
    use crate::config::settings::AppConfig;
    use crate::database::{self, achievements, matches, scores, setup, shooters, NewScore};

    fn test_state(admin_token: Option<&str>) -> Arc<AppState> {
        let pool = database::create_memory_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            setup::ensure_schema(&conn).unwrap();
            seed(&conn);
        }
        let mut config = AppConfig::new();
        config.server.admin_token = admin_token.map(str::to_string);
        Arc::new(AppState::new(pool, config))
    }

    fn seed(conn: &rusqlite::Connection) {
        let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let (m, _) = matches::insert_if_absent(conn, "Cheyenne June 2025-06-14", date, Some(1)).unwrap();

        let anna = shooters::upsert_by_name(conn, "Smith, Anna").unwrap();
        shooters::update_membership(conn, anna.id, Some("W-1"), Some(true)).unwrap();
        shooters::update_classification(conn, anna.id, Classification::A).unwrap();
        shooters::update_wyco_points(conn, anna.id, 280.0).unwrap();
        let bob = shooters::upsert_by_name(conn, "Jones, Bob").unwrap();

        for (id, place, points) in [(anna.id, 1, 200.0), (bob.id, 2, 150.0)] {
            let score = NewScore {
                stage_name: OVERALL_STAGE,
                place: Some(place),
                percentage: Some(points / 2.0),
                points: Some(points),
            };
            let stored = scores::upsert_score(conn, m.id, id, &score).unwrap();
            scores::set_wyco_points(conn, stored.id, points / 2.0).unwrap();
        }

        let top_gun = Award {
            shooter_id: anna.id,
            match_id: m.id,
            achievement: Achievement::TopGun,
        };
        achievements::insert_if_absent(conn, &top_gun).unwrap();
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn post_process(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/api/admin/process");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_shooters_ranked_by_points() {
        let app = create_router(test_state(None));
        let (status, body) = get_json(app, "/api/shooters").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["pageSize"], 50);
        assert_eq!(body["items"][0]["name"], "Smith, Anna");
        assert_eq!(body["items"][0]["rank"], 1);
        assert_eq!(body["items"][0]["classification"], "A");
        assert_eq!(body["items"][0]["activeMember"], true);
        assert_eq!(body["items"][1]["classification"], "Unclassified");
    }

    #[tokio::test]
    async fn test_shooters_filters() {
        let state = test_state(None);

        let (_, body) = get_json(create_router(state.clone()), "/api/shooters?members_only=true").await;
        assert_eq!(body["total"], 1);

        let (_, body) = get_json(create_router(state.clone()), "/api/shooters?filter=jones").await;
        assert_eq!(body["items"][0]["name"], "Jones, Bob");

        let (_, body) = get_json(create_router(state.clone()), "/api/shooters?classification=A").await;
        assert_eq!(body["total"], 1);

        let (status, _) = get_json(create_router(state), "/api/shooters?classification=Z").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let app = create_router(test_state(None));
        let (_, body) = get_json(app, "/api/shooters?page_size=10000").await;
        assert_eq!(body["pageSize"], 500);
    }

    #[tokio::test]
    async fn test_huge_page_is_rejected() {
        let state = test_state(None);

        let uri = format!("/api/shooters?page={}", usize::MAX);
        let (status, _) = get_json(create_router(state.clone()), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json(create_router(state), "/api/shooters?page=3&page_size=500").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_shooter_detail_and_missing() {
        let state = test_state(None);

        let (status, body) = get_json(create_router(state.clone()), "/api/shooters/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matchesShot"], 1);
        assert_eq!(body["eligibleScores"], 1);
        assert_eq!(body["history"][0]["venue"], "Cheyenne");
        assert_eq!(body["history"][0]["wycoPoints"], 100.0);
        assert_eq!(body["achievements"][0]["name"], "Top Gun");
        assert_eq!(body["achievements"][0]["matchDate"], "2025-06-14");

        let (status, _) = get_json(create_router(state), "/api/shooters/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_match_listing_and_scores() {
        let state = test_state(None);

        let (status, body) = get_json(create_router(state.clone()), "/api/matches").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["date"], "2025-06-14");

        let (status, body) = get_json(create_router(state.clone()), "/api/matches/1/scores").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["name"], "Smith, Anna");
        assert_eq!(body["results"][1]["wycoPoints"], 75.0);

        let (status, _) = get_json(create_router(state), "/api/matches/42/scores").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_process_authorization() {
        let disabled = create_router(test_state(None));
        let response = disabled.oneshot(post_process(Some("anything"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let state = test_state(Some("s3cret"));

        let response = create_router(state.clone()).oneshot(post_process(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = create_router(state.clone())
            .oneshot(post_process(Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = create_router(state).oneshot(post_process(Some("s3cret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_admin_process_refuses_overlapping_pass() {
        let state = test_state(Some("s3cret"));

        let running = state.try_begin_pass().unwrap();
        let response = create_router(state.clone()).oneshot(post_process(Some("s3cret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.try_begin_pass().is_none());

        drop(running);
        let response = create_router(state).oneshot(post_process(Some("s3cret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
