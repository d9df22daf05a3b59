use axum::{extract::FromRequestParts, http::header};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, error::AppError, models::Role, state::AppState};

pub const SESSION_COOKIE: &str = "session";

/// The logged-in user, taken from a bearer token or the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
    pub face_verified: bool,
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

pub fn decode_session(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".into()))?;

    let user_id = decoded
        .claims
        .sub
        .parse::<u64>()
        .map_err(|_| AppError::Unauthorized("Invalid user id in session".into()))?;

    Ok(AuthUser {
        user_id,
        username: decoded.claims.username,
        role: decoded.claims.role,
        face_verified: decoded.claims.face_verified,
    })
}

fn bearer_token(parts: &axum::http::request::Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;
    Ok(Some(token.trim().to_string()))
}

fn cookie_token(parts: &axum::http::request::Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => cookie_token(parts)
                .ok_or_else(|| AppError::Unauthorized("Please login first".into()))?,
        };
        decode_session(&token, &state.config.session_secret)
    }
}
