//! Development auth gate
//!
//! Accepts any non-empty credentials and hands out `dev-token-` bearer
//! tokens; the guard only checks the prefix. Placeholder until a real
//! identity provider is wired in, and deliberately orthogonal to the
//! annotation logic.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const TOKEN_PREFIX: &str = "dev-token-";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// `POST /api/auth/login`
pub async fn login(Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>> {
    if req.username.trim().is_empty() || req.password.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Username and password required".to_string(),
        ));
    }

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: format!("{}{}", TOKEN_PREFIX, Utc::now().timestamp_millis()),
    }))
}

/// Extractor guarding admin handlers: rejects requests without a dev
/// bearer token.
pub struct RequireAuth;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let authorized = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token.starts_with(TOKEN_PREFIX));

        if !authorized {
            return Err(AppError::Unauthorized);
        }
        Ok(RequireAuth)
    }
}
