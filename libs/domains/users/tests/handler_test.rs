//! Handler tests for the users domain
//!
//! These tests verify that the HTTP handlers work end to end against the
//! in-memory repository:
//! - Request deserialization and validation (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON, password never included)
//! - HTTP status codes
//! - Error body shape (timestamp + error message)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let repository = InMemoryUserRepository::new();
    let service = UserService::new(repository);
    handlers::router(service)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn create_payload(email: &str) -> serde_json::Value {
    json!({
        "name": "Jamie Doe",
        "email": email,
        "password": "secret1",
        "role": "user"
    })
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_create_user_returns_201_without_password() {
    let app = app();

    let response = app
        .oneshot(post_json("/", create_payload("jamie@example.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_string(response.into_body()).await;
    assert!(!body.contains("password"));
    assert!(!body.contains("secret1"));

    let user: UserResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Jamie Doe");
    assert_eq!(user.email, "jamie@example.com");
    assert_eq!(user.role, Role::User);
    assert!(user.active);
}

#[tokio::test]
async fn test_create_duplicate_email_returns_409() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", create_payload("taken@example.com")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same email, different name: still a conflict.
    let mut payload = create_payload("taken@example.com");
    payload["name"] = json!("Somebody Else");

    let response = app.oneshot(post_json("/", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Email already exists");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_create_user_validates_fields() {
    let app = app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "ab",
                "email": "not-an-email",
                "password": "12345",
                "role": "user"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert!(body["timestamp"].is_string());
    let details = body["details"].as_object().unwrap();
    assert!(details.contains_key("name"));
    assert!(details.contains_key("email"));
    assert!(details.contains_key("password"));
}

#[tokio::test]
async fn test_create_user_rejects_missing_role() {
    let app = app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "Jamie Doe",
                "email": "jamie@example.com",
                "password": "secret1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_returns_200() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", create_payload("jamie@example.com")))
        .await
        .unwrap();
    let created: UserResponse = json_body(response.into_body()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{}", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.id, created.id);
    assert_eq!(user.email, "jamie@example.com");
}

#[tokio::test]
async fn test_get_missing_user_returns_404() {
    let app = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "User not found");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_non_numeric_id_returns_400() {
    let app = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_replaces_only_what_changed() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", create_payload("jamie@example.com")))
        .await
        .unwrap();
    let created: UserResponse = json_body(response.into_body()).await;

    // Resubmit every field unchanged except active.
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/{}", created.id),
            json!({
                "name": "Jamie Doe",
                "email": "jamie@example.com",
                "password": "secret1",
                "role": "user",
                "active": false
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated: UserResponse = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.role, created.role);
    assert_eq!(updated.created_at, created.created_at);
    assert!(!updated.active);
}

#[tokio::test]
async fn test_update_missing_user_returns_404() {
    let app = app();

    let response = app
        .oneshot(put_json(
            "/999999",
            json!({
                "name": "Jamie Doe",
                "email": "jamie@example.com",
                "password": "secret1",
                "role": "user",
                "active": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_validates_fields() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", create_payload("jamie@example.com")))
        .await
        .unwrap();
    let created: UserResponse = json_body(response.into_body()).await;

    let response = app
        .oneshot(put_json(
            &format!("/{}", created.id),
            json!({
                "name": "x",
                "email": "jamie@example.com",
                "password": "secret1",
                "role": "user",
                "active": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", create_payload("jamie@example.com")))
        .await
        .unwrap();
    let created: UserResponse = json_body(response.into_body()).await;

    let delete_request = |id: i64| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete_request(created.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone for good: the second delete is a 404.
    let response = app.clone().oneshot(delete_request(created.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And so is a fetch.
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{}", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_returns_all_in_insertion_order() {
    let app = app();

    let emails = ["a@example.com", "b@example.com", "c@example.com"];
    for email in emails {
        let response = app
            .clone()
            .oneshot(post_json("/", create_payload(email)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response.into_body()).await;
    assert!(!body.contains("password"));

    let users: Vec<UserResponse> = serde_json::from_str(&body).unwrap();
    assert_eq!(users.len(), 3);
    let listed: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(listed, emails);
}
