//! Business logic services.

pub mod ban;
pub mod comment;
pub mod following;
pub mod like;
pub mod photo;
pub mod user;
pub mod visibility;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use shutter_db::IdAllocator;
use shutter_db::repositories::{
    BanRepository, CommentRepository, FollowRepository, LikeRepository, PhotoRepository,
    UserRepository,
};

pub use ban::BanService;
pub use comment::{CommentService, CommentView};
pub use following::FollowingService;
pub use like::LikeService;
pub use photo::{PhotoDetail, PhotoService};
pub use user::{UserProfile, UserService, UsernameInput};
pub use visibility::VisibilityService;

/// Every service, wired to one database.
#[derive(Clone)]
pub struct Services {
    /// User directory.
    pub user: UserService,
    /// Follow edges.
    pub following: FollowingService,
    /// Ban edges.
    pub ban: BanService,
    /// Photos and cascading delete.
    pub photo: PhotoService,
    /// Comments.
    pub comment: CommentService,
    /// Likes.
    pub like: LikeService,
    /// Stream and user directory filtering.
    pub visibility: VisibilityService,
}

impl Services {
    /// Build the repositories and services on top of `db`.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, ids: IdAllocator) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db), ids.clone());
        let photo_repo = PhotoRepository::new(Arc::clone(&db), ids.clone());
        let comment_repo = CommentRepository::new(Arc::clone(&db), ids.clone());
        let ban_repo = BanRepository::new(Arc::clone(&db), ids);
        let follow_repo = FollowRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(db);

        Self {
            user: UserService::new(user_repo.clone(), follow_repo.clone(), photo_repo.clone()),
            following: FollowingService::new(follow_repo.clone(), user_repo.clone()),
            ban: BanService::new(ban_repo, user_repo.clone()),
            photo: PhotoService::new(
                photo_repo.clone(),
                comment_repo.clone(),
                like_repo.clone(),
                user_repo.clone(),
            ),
            comment: CommentService::new(comment_repo, photo_repo.clone()),
            like: LikeService::new(like_repo, photo_repo.clone()),
            visibility: VisibilityService::new(photo_repo, user_repo),
        }
    }
}
