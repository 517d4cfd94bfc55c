//! HTTP route assembly

pub mod annotations;
pub mod excerpts;
pub mod health;

use axum::{routing::post, Router};

use crate::auth;
use crate::state::AppState;

/// Assemble the full API router
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/health", health::router())
        .route("/api/auth/login", post(auth::login))
        .nest("/api/texts", excerpts::router())
        .nest("/api/annotations", annotations::router())
}
