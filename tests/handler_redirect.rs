mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_resolver::api::handlers::{redirect_handler, redirect_root_handler};
use link_resolver::state::AppState;

fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/", get(redirect_root_handler))
        .route("/{link}", get(redirect_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let pool = common::test_pool().await;
    common::create_test_link(&pool, "redirect1", "https://example.com/target").await;
    let server = make_server(common::create_test_state(pool));

    let response = server.get("/redirect1").await;

    assert_eq!(response.status_code(), 302);

    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found_goes_to_fallback() {
    let pool = common::test_pool().await;
    let server = make_server(common::create_test_state(pool));

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_redirect_root_uses_empty_key() {
    let pool = common::test_pool().await;
    let server = make_server(common::create_test_state(pool));

    // No link for the empty key yet.
    let response = server.get("/").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "/");

    let pool = common::test_pool().await;
    common::create_test_link(&pool, "", "https://home.example/").await;
    let server = make_server(common::create_test_state(pool));

    let response = server.get("/").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://home.example/");
}

#[tokio::test]
async fn test_redirect_served_from_cache_after_first_hit() {
    let pool = common::test_pool().await;
    common::create_test_link(&pool, "cached", "https://one.example/").await;
    let server = make_server(common::create_test_state(pool.clone()));

    server.get("/cached").await;

    sqlx::query("DELETE FROM shortlinks WHERE shortpath = ?")
        .bind("cached")
        .execute(&pool)
        .await
        .unwrap();

    let response = server.get("/cached").await;
    assert_eq!(response.header("location"), "https://one.example/");
}

#[tokio::test]
async fn test_redirect_store_failure_is_unavailable() {
    let pool = common::test_pool().await;
    let server = make_server(common::create_test_state(pool.clone()));

    pool.close().await;

    let response = server.get("/anything").await;

    assert_eq!(response.status_code(), 503);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "unavailable");
}

#[tokio::test]
async fn test_redirect_invalid_stored_destination() {
    let pool = common::test_pool().await;
    common::create_test_link(&pool, "bad", "https://x.example/\nSet-Cookie: a=b").await;
    let server = make_server(common::create_test_state(pool));

    let response = server.get("/bad").await;

    assert_eq!(response.status_code(), 500);
    assert!(response.headers().get("location").is_none());

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "internal_error");
}
