//! Shared helpers: a full application over an in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::ConnectOptions;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cravecraft::api::{create_router, AppState};
use cravecraft::config::Config;
use cravecraft::domain::{Identity, Role};
use cravecraft::infra::Database;

pub const SECRET: &str = "integration-test-secret-32-bytes-long";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Keeps a file-backed database alive for the lifetime of the app
    _dir: Option<TempDir>,
}

/// One connection: every pooled handle must see the same in-memory database.
pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    build_app(options, "sqlite::memory:", None).await
}

/// A file database behind a pool of several connections, so concurrent
/// transactions really overlap.
pub async fn spawn_pooled_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("shop.db").display());

    let mut options = ConnectOptions::new(url.clone());
    options.max_connections(8).sqlx_logging(false);

    build_app(options, &url, Some(dir)).await
}

async fn build_app(options: ConnectOptions, url: &str, dir: Option<TempDir>) -> TestApp {
    let database = Database::connect_with(options).await.expect("test database");
    let config = Config::new(url, SECRET).expect("test config");

    let state = AppState::from_config(Arc::new(database), config);
    TestApp {
        router: create_router(state.clone()),
        state,
        _dir: dir,
    }
}

pub fn admin() -> Identity {
    Identity {
        id: 1,
        email: "admin@x.com".to_string(),
        role: Role::Admin,
    }
}

pub fn shopper() -> Identity {
    Identity {
        id: 2,
        email: "shopper@x.com".to_string(),
        role: Role::User,
    }
}

impl TestApp {
    /// Send a request and return the status with the raw body text.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request and parse the body as JSON (`Null` for an empty body).
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, text) = self.send(method, uri, token, body).await;
        let value = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn register(&self, email: &str, password: &str, role: Option<&str>) -> (StatusCode, Value) {
        let mut body = json!({ "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.json(Method::POST, "/api/auth/register", None, Some(body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register then log in, returning the session token.
    pub async fn token_for(&self, email: &str, role: Option<&str>) -> String {
        let (status, _) = self.register(email, "secret1", role).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self.login(email, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn create_sweet(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, "/api/sweets", Some(token), Some(body))
            .await
    }
}
