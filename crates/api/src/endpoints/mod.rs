//! API endpoints.

mod bans;
mod comments;
mod following;
mod photos;
mod session;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(session::router())
        .merge(users::router())
        .merge(photos::router())
        .merge(comments::router())
        .merge(following::router())
        .merge(bans::router())
}
