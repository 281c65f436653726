// =========================
// tests/integration/auth_flow_tests.rs
// =========================
//! End-to-end sign-in and registration flows through the HTTP router.
use crate::test_utils::{post_json, post_raw, send, setup_test_env};
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
};
use serde_json::json;
use userservice_lib::storage::CredentialStore;

const REGISTER: &str = "/api/auth/register";
const SIGNIN: &str = "/api/auth/signin";

#[tokio::test]
async fn test_register_then_sign_in() {
    let (app, _storage, _temp_dir) = setup_test_env().await;

    let (status, body) = post_json(
        &app,
        REGISTER,
        json!({"username": "alice", "email": "a@x.com", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Registration Successful"}));

    let (status, body) = post_json(
        &app,
        SIGNIN,
        json!({"username": "alice", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["roles"], json!(["ROLE_USER"]));
}

#[tokio::test]
async fn test_token_identifies_caller() {
    let (app, _storage, _temp_dir) = setup_test_env().await;
    post_json(
        &app,
        REGISTER,
        json!({"username": "mod1", "email": "m@x.com", "password": "pw123", "role": ["mod"]}),
    )
    .await;
    let (_, body) = post_json(&app, SIGNIN, json!({"username": "mod1", "password": "pw123"})).await;
    let token = body["token"].as_str().unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/me")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, profile) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], body["id"]);
    assert_eq!(profile["username"], "mod1");
    assert_eq!(profile["roles"], json!(["ROLE_MODERATOR"]));
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let (app, storage, _temp_dir) = setup_test_env().await;
    post_json(
        &app,
        REGISTER,
        json!({"username": "alice", "email": "a@x.com", "password": "pw123"}),
    )
    .await;

    let (status, body) = post_json(
        &app,
        REGISTER,
        json!({"username": "alice", "email": "b@x.com", "password": "other", "role": ["admin"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Already taken. Select another username!");

    // the original record is unaffected
    let alice = storage.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(alice.email, "a@x.com");
    assert_eq!(alice.roles.len(), 1);
    let (status, _) = post_json(&app, SIGNIN, json!({"username": "alice", "password": "pw123"})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let (app, storage, _temp_dir) = setup_test_env().await;
    post_json(
        &app,
        REGISTER,
        json!({"username": "alice", "email": "a@x.com", "password": "pw123"}),
    )
    .await;

    let (status, body) = post_json(
        &app,
        REGISTER,
        json!({"username": "bob", "email": "a@x.com", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email entered already exists, use another email");
    assert!(!storage.exists_by_username("bob").await.unwrap());
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let (app, _storage, _temp_dir) = setup_test_env().await;
    post_json(
        &app,
        REGISTER,
        json!({"username": "alice", "email": "a@x.com", "password": "pw123"}),
    )
    .await;

    let (wrong_status, wrong_body) =
        post_json(&app, SIGNIN, json!({"username": "alice", "password": "nope"})).await;
    let (unknown_status, unknown_body) =
        post_json(&app, SIGNIN, json!({"username": "mallory", "password": "pw123"})).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert!(wrong_body.get("token").is_none());
}

#[tokio::test]
async fn test_admin_role_request() {
    let (app, storage, _temp_dir) = setup_test_env().await;
    let (status, _) = post_json(
        &app,
        REGISTER,
        json!({"username": "root", "email": "r@x.com", "password": "pw123", "role": ["admin"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let root = storage.find_by_username("root").await.unwrap().unwrap();
    let names: Vec<&str> = root.roles.iter().map(|role| role.name.as_str()).collect();
    assert_eq!(names, vec!["ROLE_ADMIN"]);

    let (_, body) = post_json(&app, SIGNIN, json!({"username": "root", "password": "pw123"})).await;
    assert_eq!(body["roles"], json!(["ROLE_ADMIN"]));
}

#[tokio::test]
async fn test_mixed_role_request() {
    let (app, _storage, _temp_dir) = setup_test_env().await;
    post_json(
        &app,
        REGISTER,
        json!({
            "username": "mixed",
            "email": "m@x.com",
            "password": "pw123",
            "role": ["admin", "mod", "bogus"]
        }),
    )
    .await;

    let (_, body) = post_json(&app, SIGNIN, json!({"username": "mixed", "password": "pw123"})).await;
    assert_eq!(
        body["roles"],
        json!(["ROLE_USER", "ROLE_MODERATOR", "ROLE_ADMIN"])
    );
}

#[tokio::test]
async fn test_empty_role_list_defaults_to_user() {
    let (app, _storage, _temp_dir) = setup_test_env().await;
    post_json(
        &app,
        REGISTER,
        json!({"username": "plain", "email": "p@x.com", "password": "pw123", "role": []}),
    )
    .await;

    let (_, body) = post_json(&app, SIGNIN, json!({"username": "plain", "password": "pw123"})).await;
    assert_eq!(body["roles"], json!(["ROLE_USER"]));
}

#[tokio::test]
async fn test_malformed_bodies_rejected_before_workflow() {
    let (app, storage, _temp_dir) = setup_test_env().await;

    let (status, body) = post_raw(&app, REGISTER, "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = post_json(&app, REGISTER, json!({"username": "alice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app,
        REGISTER,
        json!({"username": "alice", "email": "not-an-email", "password": "pw123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VAL_001");

    let (status, _) = post_json(&app, SIGNIN, json!({"username": "", "password": "pw"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(!storage.exists_by_username("alice").await.unwrap());
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations() {
    let (app, storage, _temp_dir) = setup_test_env().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            post_json(
                &app,
                REGISTER,
                json!({"username": "racer", "email": format!("racer{i}@x.com"), "password": "pw123"}),
            )
            .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        if status == StatusCode::OK {
            accepted += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Already taken. Select another username!");
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(storage.user_count().await, 1);
}
