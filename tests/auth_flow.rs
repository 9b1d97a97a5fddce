//! Signup, login, logout and session checks through the HTTP router

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, PASSWORD};

const MISSING_FIELDS: &str =
    "All fields are mandatory. Please provide your username, email and password.";
const WEAK_PASSWORD: &str = "Password needs to have at least 6 chars and must contain at least one number, one lowercase and one uppercase letter.";
const DUPLICATE_USER: &str =
    "Username and email need to be unique. Either username or email is already used.";

#[tokio::test]
async fn test_signup_missing_fields() {
    let app = TestApp::new().await;

    for body in [
        json!({"lastName": "L", "email": "a@example.com", "password": PASSWORD}),
        json!({"firstName": "A", "email": "a@example.com", "password": PASSWORD}),
        json!({"firstName": "A", "lastName": "L", "password": PASSWORD}),
        json!({"firstName": "A", "lastName": "L", "email": "a@example.com", "password": ""}),
    ] {
        let response = app.post("/signup", body, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], MISSING_FIELDS);
        assert!(response.cookie.is_none());
    }

    let users = app.get("/get-users", None).await;
    assert_eq!(users.body["users"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_signup_weak_passwords() {
    let app = TestApp::new().await;

    for password in ["Ab1", "secret123", "SECRET123", "SecretOnly"] {
        let response = app
            .post(
                "/signup",
                json!({
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "email": "ada@example.com",
                    "password": password,
                }),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["message"], WEAK_PASSWORD);
    }

    let users = app.get("/get-users", None).await;
    assert!(users.body["users"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_logs_in_without_exposing_hash() {
    let app = TestApp::new().await;

    let response = app.signup("ada@example.com").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful!");
    assert_eq!(response.body["user"]["email"], "ada@example.com");
    assert!(response.body["user"].get("passwordHash").is_none());

    let cookie = response.cookie.expect("session cookie");
    assert!(cookie.starts_with("teamboard.sid="));

    let session = app.get("/isLoggedIn", Some(&cookie)).await;
    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.body["user"]["email"], "ada@example.com");
    assert!(session.body["user"].get("passwordHash").is_none());

    let users = app.get("/get-users", None).await;
    assert_eq!(users.status, StatusCode::OK);
    assert!(!users.body.to_string().contains("passwordHash"));
    assert!(!users.body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new().await;

    assert_eq!(app.signup("ada@example.com").await.status, StatusCode::OK);

    let duplicate = app.signup("ADA@example.com").await;
    assert_eq!(duplicate.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(duplicate.body["message"], DUPLICATE_USER);

    let users = app.get("/get-users", None).await;
    assert_eq!(users.body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let app = TestApp::new().await;

    let response = app.signup("not-an-email").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Please use a valid email address.");
}

#[tokio::test]
async fn test_login_outcomes() {
    let app = TestApp::new().await;
    app.signup("ada@example.com").await;

    let ok = app
        .post(
            "/login",
            json!({"email": "ada@example.com", "password": PASSWORD}),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["message"], "Login successful!");
    let cookie = ok.cookie.expect("session cookie");
    assert_eq!(
        app.get("/isLoggedIn", Some(&cookie)).await.status,
        StatusCode::OK
    );

    let wrong = app
        .post(
            "/login",
            json!({"email": "ada@example.com", "password": "Wrong123"}),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], "Incorrect email or password.");
    assert!(wrong.cookie.is_none());

    let unknown = app
        .post(
            "/login",
            json!({"email": "grace@example.com", "password": PASSWORD}),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["message"], "Incorrect email or password.");

    let missing = app.post("/login", json!({"email": "ada@example.com"}), None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["message"], "Missing credentials");
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new().await;

    let anonymous = app.post("/logout", json!({}), None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["message"], "Unauthorized access!");

    let cookie = app.signed_in("ada@example.com").await;
    let response = app.post("/logout", json!({}), Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logout successful!");
    assert_eq!(response.cookie.as_deref(), Some("teamboard.sid="));

    let after = app.get("/isLoggedIn", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.body["message"], "Unauthorized access!");
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let app = TestApp::new().await;
    let cookie = app.signed_in("ada@example.com").await;

    let (name_and_id, _signature) = cookie.rsplit_once('.').unwrap();
    let forged = format!("{}.{}", name_and_id, "0".repeat(64));

    let response = app.get("/isLoggedIn", Some(&forged)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user_ignores_mass_assignment() {
    let app = TestApp::new().await;
    let cookie = app.signed_in("ada@example.com").await;

    let response = app
        .post(
            "/update-user",
            json!({
                "firstName": "Augusta",
                "passwordHash": "attacker-controlled",
                "id": "00000000-0000-4000-8000-000000000000",
                "teams": ["00000000-0000-4000-8000-000000000000"],
            }),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["firstName"], "Augusta");
    assert_eq!(response.body["user"]["teams"], json!([]));
    assert_ne!(
        response.body["user"]["id"],
        "00000000-0000-4000-8000-000000000000"
    );
    assert!(response.body["user"].get("passwordHash").is_none());

    // the original password still works
    let login = app
        .post(
            "/login",
            json!({"email": "ada@example.com", "password": PASSWORD}),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_requires_session() {
    let app = TestApp::new().await;

    let response = app
        .post("/update-user", json!({"firstName": "Nobody"}), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Unauthorized access!");
}

#[tokio::test]
async fn test_update_user_email_conflict() {
    let app = TestApp::new().await;
    app.signup("ada@example.com").await;
    let cookie = app.signed_in("grace@example.com").await;

    let response = app
        .post(
            "/update-user",
            json!({"email": "ada@example.com"}),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], DUPLICATE_USER);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = TestApp::new().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["type"], "invalid_request_error");
    assert_eq!(response.body["code"], "json_parse_error");
}

#[tokio::test]
async fn test_health_and_response_headers() {
    let app = TestApp::new().await;

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.headers["x-content-type-options"], "nosniff");
    assert!(health.headers.contains_key("x-request-id"));

    let ready = app.get("/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["checks"].as_array().unwrap().len(), 2);

    assert_eq!(app.get("/live", None).await.status, StatusCode::OK);
}
