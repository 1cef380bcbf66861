// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use gym_tracker::config::Config;
use gym_tracker::db::Db;
use gym_tracker::routes::create_router;
use gym_tracker::AppState;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// Check if a Postgres database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Skip test with message if no database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the configured test database and apply migrations.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
    let db = Db::connect(&url, 5)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");
    db
}

/// Catalog ids seeded into every offline test app.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct TestCatalog {
    pub barbell: i64,
    pub bench_press: i64,
    pub back_squat: i64,
    pub dumbbell_curl: i64,
    pub plank: i64,
}

/// Create a test app over the in-memory store with a small seeded catalog.
/// Returns the router, the shared state and the seeded ids.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TestCatalog) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>, TestCatalog) {
    let db = Db::new_in_memory();
    let store = db.memory().expect("in-memory store");

    let barbell = store.add_equipment("Barbell", Some("free weights"));
    let dumbbell = store.add_equipment("Dumbbell", Some("free weights"));
    store.add_equipment("Cable Machine", Some("machines"));

    let catalog = TestCatalog {
        barbell: barbell.id,
        bench_press: store.add_exercise("Bench Press", "chest", Some(&barbell)).id,
        back_squat: store.add_exercise("Back Squat", "legs", Some(&barbell)).id,
        dumbbell_curl: store.add_exercise("Dumbbell Curl", "arms", Some(&dumbbell)).id,
        plank: store.add_exercise("Plank", "core", None).id,
    };

    let state = Arc::new(AppState::new(config, db).expect("Failed to build app state"));
    (create_router(state.clone()), state, catalog)
}

#[allow(dead_code)]
fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign arbitrary claims with HS256.
#[allow(dead_code)]
pub fn sign_claims(claims: &Value, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// Create a valid test token for `sub` against the test configuration.
#[allow(dead_code)]
pub fn create_test_jwt(sub: &str, config: &Config) -> String {
    let secret = config.jwt_secret.as_deref().expect("test secret");
    sign_claims(
        &json!({
            "sub": sub,
            "exp": now_secs() + 3600,
            "iat": now_secs(),
            "iss": config.expected_issuer,
            "role": "authenticated",
        }),
        secret,
    )
}

/// Create a token whose `exp` is in the past.
#[allow(dead_code)]
pub fn create_expired_jwt(sub: &str, config: &Config) -> String {
    let secret = config.jwt_secret.as_deref().expect("test secret");
    sign_claims(
        &json!({
            "sub": sub,
            "exp": now_secs() - 60,
            "iat": now_secs() - 3600,
            "iss": config.expected_issuer,
        }),
        secret,
    )
}

/// Send a request and decode the JSON response body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// Send a prebuilt request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send_request(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
