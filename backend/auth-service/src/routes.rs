/// Route definitions and middleware setup
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{delete_me, get_me, login, logout, refresh_token, register, update_me};
use crate::AppState;

/// Build the REST router; every auth route lives under `/api/v1/auth`
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/users/me", get(get_me).put(update_me).delete(delete_me));

    Router::new()
        .nest("/api/v1/auth", auth_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
