//! Router assembly.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::state::AppState;

/// Build the application router with the provided shared state.
///
/// Separate from `main` so integration tests can mount the app in-process.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", delete(auth::logout))
        .route("/check_session", get(auth::check_session))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
