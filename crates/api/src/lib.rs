//! HTTP API layer for shutter.
//!
//! Thin axum handlers over the services in `shutter-core`:
//!
//! - **Endpoints**: sessions, users and profiles, photos, likes, comments, follows, bans
//! - **Extractors**: the authenticated acting user
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state};

pub use endpoints::router;
pub use middleware::AppState;

/// Router with authentication applied and state attached.
pub fn app(state: AppState) -> Router {
    router()
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state)
}
