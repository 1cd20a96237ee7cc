use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use tournament_api::{
    config::{Config, Role},
    db, AppState,
};

fn test_config(role: Role) -> Config {
    Config::from_lookup(|key| match key {
        "ROLE" => Some(role.to_string()),
        "REGION" => Some("test-region".to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        // one connection keeps the in-memory database alive and shared
        "DB_POOL_MAX" => Some("1".to_string()),
        "STATIC_DIR" => Some(concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string()),
        _ => None,
    })
    .unwrap()
}

async fn setup(role: Role) -> (AppState, Router) {
    let state = AppState::initialize(test_config(role)).await;
    let app = tournament_api::app(state.clone());
    (state, app)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_match(app: &Router, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/match")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn names(rows: &Value, field: &str) -> Vec<String> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|row| row[field].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_standings_follow_points_then_goal_difference() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = get(&app, "/api/standings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body, "TeamName"),
        vec!["India", "Pakistan", "Sri Lanka", "Bangladesh"]
    );
    assert_eq!(body[0]["Points"], 4);
    assert_eq!(body[0]["GoalDifference"], 15);
}

#[tokio::test]
async fn test_standings_order_holds_for_added_rows() {
    let (state, app) = setup(Role::Primary).await;
    let pool = state.pool().unwrap();
    sqlx::query(
        "INSERT INTO standings (team_name, points, goal_difference) VALUES ('Nepal', 2, 0), ('Oman', 4, -1)",
    )
    .execute(pool)
    .await
    .unwrap();

    let (_, body) = get(&app, "/api/standings").await;

    assert_eq!(
        names(&body, "TeamName"),
        vec!["India", "Oman", "Pakistan", "Nepal", "Sri Lanka", "Bangladesh"]
    );
}

#[tokio::test]
async fn test_player_stats_follow_runs_then_wickets() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = get(&app, "/api/player-stats").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    for pair in rows.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (runs_a, runs_b) = (a["Runs"].as_i64().unwrap(), b["Runs"].as_i64().unwrap());
        assert!(runs_a >= runs_b);
        if runs_a == runs_b {
            assert!(a["Wickets"].as_i64().unwrap() >= b["Wickets"].as_i64().unwrap());
        }
    }

    let players = names(&body, "PlayerName");
    assert_eq!(players[0], "Shubman Gill");
    let shaheen = players.iter().position(|p| p == "Shaheen Afridi").unwrap();
    let mustafizur = players.iter().position(|p| p == "Mustafizur Rahman").unwrap();
    assert!(shaheen < mustafizur);
}

#[tokio::test]
async fn test_group_matches_sorted_by_date() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = get(&app, "/api/group-matches").await;

    assert_eq!(status, StatusCode::OK);
    let dates = names(&body, "MatchDate");
    assert_eq!(dates.len(), 6);
    assert_eq!(dates[0], "2025-08-28");
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    assert!(body[5]["Result"].is_null());
}

#[tokio::test]
async fn test_create_match_on_writable_primary() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = post_match(
        &app,
        json!({ "MatchDate": "2025-09-04", "Team1": "Nepal", "Team2": "UAE" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["MatchID"].as_i64().unwrap();
    assert!(id > 0);

    let (_, matches) = get(&app, "/api/group-matches").await;
    let last = matches.as_array().unwrap().last().unwrap();
    assert_eq!(last["MatchID"], id);
    assert_eq!(last["Team1"], "Nepal");
    assert_eq!(last["Team2"], "UAE");
    assert!(last["Venue"].is_null());
    assert!(last["Stage"].is_null());
}

#[tokio::test]
async fn test_unpadded_match_date_sorts_by_calendar_date() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = post_match(
        &app,
        json!({ "MatchDate": "2025-8-1", "Team1": "Nepal", "Team2": "UAE" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["MatchID"].as_i64().unwrap();

    let (_, matches) = get(&app, "/api/group-matches").await;
    let dates = names(&matches, "MatchDate");
    assert_eq!(dates[0], "2025-08-01");
    assert_eq!(matches[0]["MatchID"], id);
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_create_match_requires_both_teams() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) =
        post_match(&app, json!({ "MatchDate": "2025-09-04", "Team1": "Nepal" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Team2"));

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/match")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_secondary_refuses_writes_without_touching_database() {
    let (_, app) = setup(Role::Secondary).await;

    let (status, _) = post_match(
        &app,
        json!({ "MatchDate": "2025-09-04", "Team1": "Nepal", "Team2": "UAE" }),
    )
    .await;
    assert_eq!(status, StatusCode::LOCKED);

    // invalid bodies are refused the same way
    let (status, _) = post_match(&app, json!({})).await;
    assert_eq!(status, StatusCode::LOCKED);

    let (_, matches) = get(&app, "/api/group-matches").await;
    assert_eq!(matches.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_health_on_writable_primary() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["role"], "primary");
    assert_eq!(body["region"], "test-region");
    assert_eq!(body["database"]["connected"], true);
    assert_eq!(body["database"]["readOnly"], false);
}

#[tokio::test]
async fn test_read_only_primary_is_degraded_and_refuses_writes() {
    let (state, app) = setup(Role::Primary).await;
    sqlx::query("PRAGMA query_only = ON")
        .execute(state.pool().unwrap())
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"]["readOnly"], true);

    let (status, _) = post_match(
        &app,
        json!({ "MatchDate": "2025-09-04", "Team1": "Nepal", "Team2": "UAE" }),
    )
    .await;
    assert_eq!(status, StatusCode::LOCKED);

    // reads keep working
    let (status, _) = get(&app, "/api/standings").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_read_only_secondary_is_healthy() {
    let (state, app) = setup(Role::Secondary).await;
    sqlx::query("PRAGMA query_only = ON")
        .execute(state.pool().unwrap())
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["readOnly"], true);
}

#[tokio::test]
async fn test_without_database_everything_is_unavailable() {
    for role in [Role::Primary, Role::Secondary] {
        let app = tournament_api::app(AppState::new(test_config(role), None, false, false));

        let (status, body) = get(&app, "/api/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");

        for uri in ["/api/group-matches", "/api/standings", "/api/player-stats"] {
            let (status, _) = get(&app, uri).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        }
    }

    let app = tournament_api::app(AppState::new(test_config(Role::Primary), None, false, false));
    let (status, _) = post_match(
        &app,
        json!({ "MatchDate": "2025-09-04", "Team1": "Nepal", "Team2": "UAE" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_failed_health_check_marks_instance_disconnected() {
    let (state, app) = setup(Role::Secondary).await;
    state.db.as_ref().unwrap().pool.close().await;

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"]["connected"], false);
    assert!(!state.readiness.is_connected());

    // the cached flag short-circuits reads to 503 instead of a failing query
    let (status, _) = get(&app, "/api/standings").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_database_reached_after_startup_gets_tables() {
    // as if the startup connection failed and only the lazy pool remained
    let config = test_config(Role::Primary);
    let lazy = db::connect_lazy(&config.database).unwrap();
    let app = tournament_api::app(AppState::new(config, Some(lazy), false, false));

    let (status, _) = get(&app, "/api/standings").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);

    let (status, body) = get(&app, "/api/standings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body, "TeamName"),
        vec!["India", "Pakistan", "Sri Lanka", "Bangladesh"]
    );

    // later checks leave the seeded rows alone
    get(&app, "/api/health").await;
    let (_, matches) = get(&app, "/api/group-matches").await;
    assert_eq!(matches.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let (_, app) = setup(Role::Primary).await;

    let (status, body) = get(&app, "/api/teams").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource not found");
}

#[tokio::test]
async fn test_debug_reports_identity_without_credentials() {
    let (_, app) = setup(Role::Secondary).await;

    let (status, body) = get(&app, "/api/debug").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "secondary");
    assert_eq!(body["region"], "test-region");
    assert_eq!(body["database"]["driver"], "sqlite");
    assert_eq!(body["database"]["poolMax"], 1);
    assert_eq!(body["readiness"]["connected"], true);
    assert!(body["database"].get("url").is_none());
}

#[tokio::test]
async fn test_frontend_fallback_serves_index() {
    let (_, app) = setup(Role::Primary).await;

    for uri in ["/", "/standings/view"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}
