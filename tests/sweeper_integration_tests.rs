//! Integration Tests for the Sweeper
//!
//! Runs the sweeper and the status API against an in-memory SQLite database.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use session_sweeper::{api::create_router, AppState, SqliteSessionStore, Sweeper};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

// == Helper Functions ==

async fn memory_pool() -> SqlitePool {
    // One connection, so every statement sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("CREATE TABLE sessions (id INTEGER PRIMARY KEY, data BLOB, expires_on TEXT NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

async fn insert_session(pool: &SqlitePool, id: i64, offset: &str) {
    sqlx::query("INSERT INTO sessions (id, expires_on) VALUES (?, datetime('now', ?))")
        .bind(id)
        .bind(offset)
        .execute(pool)
        .await
        .unwrap();
}

async fn session_ids(pool: &SqlitePool) -> Vec<i64> {
    sqlx::query_scalar("SELECT id FROM sessions ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

fn sweeper_for(pool: &SqlitePool) -> Sweeper {
    let store = SqliteSessionStore::new(pool.clone());
    Sweeper::new(Arc::new(store), "sessions").unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// == Sweeper Lifecycle Tests ==

#[tokio::test]
async fn test_expired_session_removed_and_live_session_kept() {
    let pool = memory_pool().await;
    insert_session(&pool, 1, "-1 hour").await;
    insert_session(&pool, 2, "+1 hour").await;

    let sweeper = sweeper_for(&pool);
    let handle = sweeper.start(Duration::from_millis(10)).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session_ids(&pool).await, vec![2]);

    sweeper.stop(handle).await.unwrap();
    assert!(!sweeper.is_running());

    // Anything that expires from here on must stay put
    insert_session(&pool, 3, "-1 hour").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session_ids(&pool).await, vec![2, 3]);

    pool.close().await;
}

#[tokio::test]
async fn test_single_sweep_removes_exactly_expired_rows() {
    let pool = memory_pool().await;
    for id in 1..=5 {
        insert_session(&pool, id, "-10 minutes").await;
    }
    for id in 100..=102 {
        insert_session(&pool, id, "+10 minutes").await;
    }

    let sweeper = sweeper_for(&pool);
    assert_eq!(sweeper.delete_expired().await.unwrap(), 5);
    assert_eq!(session_ids(&pool).await, vec![100, 101, 102]);

    // Nothing left to expire
    assert_eq!(sweeper.delete_expired().await.unwrap(), 0);
    assert_eq!(session_ids(&pool).await, vec![100, 101, 102]);
}

#[tokio::test]
async fn test_missing_table_failure_keeps_loop_alive() {
    let pool = memory_pool().await;
    let store = SqliteSessionStore::new(pool.clone());
    let sweeper = Sweeper::new(Arc::new(store), "missing_sessions").unwrap();

    let handle = sweeper.start(Duration::from_millis(10)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let stats = sweeper.stats().await;
    assert!(stats.failures >= 2, "failed sweeps should be retried each tick");
    assert_eq!(stats.successes, 0);
    assert!(sweeper.is_running());

    sweeper.stop(handle).await.unwrap();
}

#[tokio::test]
async fn test_stop_then_close_pool() {
    let pool = memory_pool().await;
    let sweeper = sweeper_for(&pool);
    let handle = sweeper.start(Duration::from_millis(5)).unwrap();

    tokio::time::sleep(Duration::from_millis(30)).await;
    sweeper.stop(handle).await.unwrap();
    pool.close().await;

    let attempts = sweeper.stats().await.attempts;
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(sweeper.stats().await.attempts, attempts);
}

// == Status API Tests ==

#[tokio::test]
async fn test_sweep_endpoint_deletes_expired_rows() {
    let pool = memory_pool().await;
    insert_session(&pool, 1, "-1 hour").await;
    insert_session(&pool, 2, "-2 hours").await;
    insert_session(&pool, 3, "+1 hour").await;

    let app = create_router(AppState::new(sweeper_for(&pool)));
    let response = post(app, "/sweep").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["table"], "sessions");
    assert_eq!(json["rows_deleted"], 2);
    assert_eq!(session_ids(&pool).await, vec![3]);
}

#[tokio::test]
async fn test_stats_endpoint_reflects_running_sweeper() {
    let pool = memory_pool().await;
    insert_session(&pool, 1, "-1 hour").await;

    let sweeper = sweeper_for(&pool);
    let handle = sweeper.start(Duration::from_millis(10)).unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    let app = create_router(AppState::new(sweeper.clone()));
    let response = get(app, "/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["table"], "sessions");
    assert_eq!(json["running"], true);
    assert_eq!(json["rows_deleted"], 1);
    assert_eq!(json["failures"], 0);
    assert!(json["attempts"].as_u64().unwrap() >= 1);

    sweeper.stop(handle).await.unwrap();
}

#[tokio::test]
async fn test_health_endpoint_after_stop() {
    let pool = memory_pool().await;
    let sweeper = sweeper_for(&pool);
    let handle = sweeper.start(Duration::from_secs(60)).unwrap();
    sweeper.stop(handle).await.unwrap();

    let app = create_router(AppState::new(sweeper));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["sweeper_running"], false);
}
