//! Database entities.

pub mod ban;
pub mod comment;
pub mod follow;
pub mod like;
pub mod photo;
pub mod user;

pub use ban::Entity as Ban;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use photo::Entity as Photo;
pub use user::Entity as User;
