use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{
        password::{hash_password, verify_login},
        start_session, AuthUser, Role,
    },
    error::{AppError, Result},
    models::user::{LoginRequest, LoginResponse, RegisterRequest, User, UserProfile},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    req.validate()?;

    let user = User {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_lowercase(),
        password_hash: hash_password(&req.password)?,
        role: req.role.unwrap_or(Role::Teacher),
        department: req.department.trim().to_string(),
        employee_id: req.employee_id.trim().to_string(),
        created_at: OffsetDateTime::now_utc(),
    };
    state.store.insert_user(user.clone()).await?;
    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

    let token = start_session(
        state.store.as_ref(),
        &user,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserProfile::from(&user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<LoginResponse>> {
    let user = state.store.find_user_by_email(req.email.trim()).await?;

    let matches = verify_login(&req.password, user.as_ref().map(|u| u.password_hash.as_str()))?;
    let user = match user {
        Some(user) if matches => user,
        Some(user) => {
            tracing::warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::Unauthorized);
        }
        None => return Err(AppError::Unauthorized),
    };

    let token = start_session(
        state.store.as_ref(),
        &user,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .await?;

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>> {
    state.store.delete_session(&auth.token_hash).await?;
    tracing::info!(user_id = %auth.id, "Logged out");
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<UserProfile>> {
    let user = state
        .store
        .get_user(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(UserProfile::from(&user)))
}
