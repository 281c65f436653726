//! Accounts and tokens survive a service restart over the same data directory.
use crate::test_utils::{post_json, send, test_settings};
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use userservice_lib::{create_router, storage::FlatFileStorage, AppState};

async fn start(temp_dir: &TempDir) -> Router {
    let settings = test_settings(temp_dir);
    let storage = FlatFileStorage::open(&settings.data_dir).await.unwrap();
    storage.seed_roles().await.unwrap();
    create_router(Arc::new(AppState::new(storage, settings)))
}

#[tokio::test]
async fn test_accounts_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let first = start(&temp_dir).await;
    let (status, _) = post_json(
        &first,
        "/api/auth/register",
        json!({"username": "alice", "email": "a@x.com", "password": "pw123", "role": ["mod"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, signed_in) = post_json(
        &first,
        "/api/auth/signin",
        json!({"username": "alice", "password": "pw123"}),
    )
    .await;
    drop(first);

    let second = start(&temp_dir).await;
    let (status, body) = post_json(
        &second,
        "/api/auth/signin",
        json!({"username": "alice", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], signed_in["id"]);
    assert_eq!(body["roles"], json!(["ROLE_MODERATOR"]));

    // still unique after the restart
    let (status, _) = post_json(
        &second,
        "/api/auth/register",
        json!({"username": "alice", "email": "new@x.com", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // tokens issued before the restart are still honoured
    let token = signed_in["token"].as_str().unwrap();
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, profile) = send(&second, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
}

#[tokio::test]
async fn test_unseeded_store_is_a_server_error() {
    let temp_dir = TempDir::new().unwrap();
    let settings = test_settings(&temp_dir);
    let storage = FlatFileStorage::open(&settings.data_dir).await.unwrap();
    let app = create_router(Arc::new(AppState::new(storage.clone(), settings)));

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "email": "a@x.com", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "ROLE_001");
    assert_eq!(storage.user_count().await, 0);
}
