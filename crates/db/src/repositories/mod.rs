//! Database repositories.

mod ban;
mod comment;
mod follow;
mod like;
mod photo;
mod user;

pub use ban::{BanInsert, BanRepository};
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use photo::PhotoRepository;
pub use user::UserRepository;
