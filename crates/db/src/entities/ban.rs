//! Ban entity (directed ban edges between users).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ban_id: String,

    /// The user who issued the ban
    pub banned_by: String,

    /// The user being banned
    pub banned_user: String,

    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BannedBy",
        to = "super::user::Column::UserId"
    )]
    Banner,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BannedUser",
        to = "super::user::Column::UserId"
    )]
    Banned,
}

impl ActiveModelBehavior for ActiveModel {}
