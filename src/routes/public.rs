use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a bearer token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /signup
        .route("/signup", post(handlers::signup))
        // POST /login
        // Returns {"token": "..."} for valid credentials.
        .route("/login", post(handlers::login))
}
