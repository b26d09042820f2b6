pub mod auth;
pub mod balance;
pub mod departments;
pub mod leave;
pub mod reports;
pub mod slots;

use axum::{
    routing::{get, post, put},
    Json, Router,
};

use crate::AppState;

/// Every route except login, which the binary mounts behind its rate limiter.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Departments
        .route("/api/departments", get(departments::list))
        // Leave applications
        .route("/api/leave", get(leave::list).post(leave::create))
        .route("/api/leave/:id", get(leave::get_one))
        .route("/api/leave/:id/approve", put(leave::approve))
        .route("/api/leave/:id/reject", put(leave::reject))
        // Balances
        .route("/api/balance", get(balance::own))
        .route("/api/balance/:user_id", get(balance::for_user))
        // Reports
        .route("/api/reports/monthly", get(reports::monthly))
        // Time slots
        .route("/api/slots", get(slots::list))
        .route("/api/slots/:id/book", post(slots::book))
        .route("/api/slots/:id/cancel", post(slots::cancel))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
