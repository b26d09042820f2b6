pub mod password;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{Session, User};
use crate::store::Store;
use crate::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Hod,
    Principal,
}

impl Role {
    pub fn can_review_leave(&self) -> bool {
        matches!(self, Role::Hod | Role::Principal)
    }

    /// Whether the department-scoping policy applies to this reviewer.
    pub fn is_department_scoped(&self) -> bool {
        matches!(self, Role::Hod)
    }

    pub fn can_view_reports(&self) -> bool {
        matches!(self, Role::Hod | Role::Principal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub role: Role,
    pub jti: Uuid, // unique per login
    pub exp: i64,
    pub iat: i64,
}

/// The resolved caller identity. Role and department are read from the
/// store on every request, not trusted from the token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub token_hash: String,
}

impl AuthUser {
    pub fn from_user(user: &User, token_hash: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            department: user.department.clone(),
            token_hash,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;
        let token = bearer.token();

        let key = DecodingKey::from_secret(app_state.jwt_secret.as_bytes());
        let claims = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                tracing::warn!("JWT decode failed: {}", e);
                AppError::Unauthorized
            })?
            .claims;

        // A valid signature is not enough: the session must not have been logged out.
        let token_hash = token_fingerprint(token);
        let session = app_state
            .store
            .get_session(&token_hash)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if session.user_id != claims.sub {
            return Err(AppError::Unauthorized);
        }
        if session.expires_at <= OffsetDateTime::now_utc() {
            app_state.store.delete_session(&token_hash).await?;
            return Err(AppError::Unauthorized);
        }

        let user = app_state
            .store
            .get_user(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser::from_user(&user, token_hash))
    }
}

/// Hex SHA-256 of a bearer token; the session table is keyed by this, never the raw token.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub fn create_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    expiry_hours: u64,
) -> anyhow::Result<(String, Claims)> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = OffsetDateTime::now_utc();
    let exp = now + time::Duration::hours(expiry_hours as i64);

    let claims = Claims {
        sub: user_id,
        role,
        jti: Uuid::new_v4(),
        exp: exp.unix_timestamp(),
        iat: now.unix_timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

/// Issues a token for `user` and records its session.
pub async fn start_session(
    store: &dyn Store,
    user: &User,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, AppError> {
    let (token, claims) = create_token(user.id, user.role, secret, expiry_hours)?;
    let now = OffsetDateTime::now_utc();
    let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid token expiry: {}", e)))?;

    store
        .put_session(Session {
            token_hash: token_fingerprint(&token),
            user_id: user.id,
            created_at: now,
            expires_at,
        })
        .await?;

    Ok(token)
}
