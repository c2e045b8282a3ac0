//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use shutter_core::{
    BanService, CommentService, FollowingService, LikeService, PhotoService, Services,
    UserService, VisibilityService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// User directory and token resolution.
    pub user_service: UserService,
    /// Follow edges.
    pub following_service: FollowingService,
    /// Ban edges.
    pub ban_service: BanService,
    /// Photos.
    pub photo_service: PhotoService,
    /// Comments.
    pub comment_service: CommentService,
    /// Likes.
    pub like_service: LikeService,
    /// Stream and user list.
    pub visibility_service: VisibilityService,
}

impl From<Services> for AppState {
    fn from(s: Services) -> Self {
        Self {
            user_service: s.user,
            following_service: s.following,
            ban_service: s.ban,
            photo_service: s.photo,
            comment_service: s.comment,
            like_service: s.like,
            visibility_service: s.visibility,
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the request
/// extensions. Requests without a valid token pass through unauthenticated; handlers
/// that need a user reject them via the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token.trim()).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
