#![allow(dead_code)]
use std::{net::SocketAddr, sync::Arc};

use axum::routing::post;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use leavedesk_backend::{
    api,
    auth::{password::hash_password, Role},
    config::{Config, LogFormat, ReviewerScope},
    models::user::User,
    seed,
    store::{MemoryStore, Store},
    AppState,
};

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";
pub const PASSWORD: &str = "testpass123";

fn test_config(scope: ReviewerScope) -> Config {
    Config {
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: 12,
        listen_addr: "127.0.0.1:0".into(),
        cors_origins: vec![],
        monthly_leave_allowance: 5,
        reviewer_scope: scope,
        timezone: chrono_tz::Tz::UTC,
        seed_default_users: false,
        log_format: LogFormat::Text,
    }
}

/// Spin up a real Axum server on a random port over a fresh in-memory store,
/// returning its address and the state so tests can seed users directly.
pub async fn setup_test_app(scope: ReviewerScope) -> (SocketAddr, AppState) {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    seed::seed_departments(store.as_ref())
        .await
        .expect("Failed to seed departments");

    let state = AppState::new(&test_config(scope), store)
        .await
        .expect("Failed to build app state");

    // The binary mounts login behind a rate limiter; tests mount it bare.
    let login_router = axum::Router::new()
        .route("/api/auth/login", post(api::auth::login))
        .with_state(state.clone());

    let app = api::router(state.clone()).merge(login_router);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

/// Insert a user straight into the store. Returns (user_id, email).
pub async fn create_test_user(state: &AppState, role: Role, department: &str) -> (Uuid, String) {
    let id = Uuid::new_v4();
    let email = format!("user+{}@college.test", &id.to_string()[..8]);
    let user = User {
        id,
        name: format!("Test {:?} {}", role, &id.to_string()[..4]),
        email: email.clone(),
        password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
        role,
        department: department.into(),
        employee_id: format!("EMP-{}", &id.to_string()[..8]),
        created_at: OffsetDateTime::now_utc(),
    };
    state
        .store
        .insert_user(user)
        .await
        .expect("Failed to create test user");
    (id, email)
}

/// Create a user and log them in. Returns (user_id, token).
pub async fn login_as(addr: SocketAddr, state: &AppState, role: Role, department: &str) -> (Uuid, String) {
    let (id, email) = create_test_user(state, role, department).await;
    (id, get_auth_token(addr, &email, PASSWORD).await)
}

/// Log in via the HTTP API and return the JWT token.
pub async fn get_auth_token(addr: SocketAddr, email: &str, password: &str) -> String {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(resp.status(), 200, "Login should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("Response should contain token")
        .to_string()
}

/// Create a correctly signed JWT that is already expired.
pub fn create_expired_token(user_id: Uuid) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use leavedesk_backend::auth::Claims;

    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        role: Role::Teacher,
        jti: Uuid::new_v4(),
        exp: (now - Duration::hours(1)).unix_timestamp(),
        iat: (now - Duration::hours(2)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create expired token")
}

/// A day in next calendar month, so it is never in the past and every
/// request in a test lands in the same balance month.
pub fn next_month(day: u8) -> time::Date {
    let first = OffsetDateTime::now_utc().date().replace_day(1).unwrap();
    (first + Duration::days(32)).replace_day(day).unwrap()
}

pub fn leave_body(start: time::Date, days: i64, leave_type: &str) -> serde_json::Value {
    serde_json::json!({
        "start_date": start.to_string(),
        "end_date": (start + Duration::days(days - 1)).to_string(),
        "leave_type": leave_type,
        "reason": "Attending a family function",
    })
}

/// Build a reqwest client (reusable across requests in a test).
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}
