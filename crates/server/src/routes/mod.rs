//! HTTP route handlers for the order server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to the order form
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (credential file readable)
//! GET  /static/style.css       - Stylesheet
//! GET  /static/estimate.js     - Live estimate script
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order form and history
//! POST /orders                 - Submit an order
//! GET  /orders/estimate        - Estimate fragment (?unit=&quantity=)
//! GET  /orders/history.csv     - Whole history as CSV
//! ```

pub mod assets;
pub mod auth;
pub mod orders;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::submit))
        .route("/estimate", get(orders::estimate))
        .route("/history.csv", get(orders::history_csv))
}

/// Create all routes for the order server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/orders") }))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/static/style.css", get(assets::style_css))
        .route("/static/estimate.js", get(assets::estimate_js))
        .nest("/auth", auth_routes())
        .nest("/orders", order_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the credential file cannot be read,
/// since no operator could log in.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.credentials().repository().load().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
