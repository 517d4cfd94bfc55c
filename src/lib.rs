//! Marginalia Server
//!
//! A self-hosted text-annotation service: an admin uploads text excerpts,
//! readers select spans of text and attach comments to them. The
//! annotation core ([`annotations`]) is pure and synchronous; SQLite
//! persistence and the HTTP surface sit around it.

pub mod annotations;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod excerpts;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with tracing and CORS layers applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
