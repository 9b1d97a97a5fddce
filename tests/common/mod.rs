//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use teamboard::api::create_router;
use tower::ServiceExt;

pub const PASSWORD: &str = "Secret123";

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// `name=value` part of the `Set-Cookie` header
    pub cookie: Option<String>,
    pub headers: axum::http::HeaderMap,
}

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = teamboard::create_app_state().await.unwrap();
        Self {
            router: create_router(state),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            body,
            cookie,
            headers,
        }
    }

    /// Sign up a user and return the response; the session cookie is in `cookie`
    pub async fn signup(&self, email: &str) -> TestResponse {
        self.post(
            "/signup",
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": email,
                "password": PASSWORD,
            }),
            None,
        )
        .await
    }

    /// Sign up and return the session cookie
    pub async fn signed_in(&self, email: &str) -> String {
        let response = self.signup(email).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.cookie.unwrap()
    }
}
