//! HTTP route handlers for the quote service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (database connectivity)
//!
//! # Quotes
//! POST /api/quotes          - Calculate a shipping quote
//!
//! # Profiles
//! GET  /api/profiles        - List active correction profiles
//! GET  /api/profiles/{id}   - Fetch a single active profile
//! ```

pub mod profiles;
pub mod quotes;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the quote routes router.
pub fn quote_routes() -> Router<AppState> {
    Router::new().route("/", post(quotes::create_quote))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list_profiles))
        .route("/{id}", get(profiles::get_profile))
}

/// Create all API routes for the quote service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/quotes", quote_routes())
        .nest("/api/profiles", profile_routes())
}
