//! Create likes table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Likes::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Likes::PhotoId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Likes::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(Index::create().col(Likes::UserId).col(Likes::PhotoId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_likes_photo")
                            .from(Likes::Table, Likes::PhotoId)
                            .to(Photos::Table, Photos::PhotoId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_likes_user")
                            .from(Likes::Table, Likes::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: photo_id (like counts, cascade delete)
        manager
            .create_index(
                Index::create()
                    .name("idx_likes_photo_id")
                    .table(Likes::Table)
                    .col(Likes::PhotoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Likes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Likes {
    Table,
    UserId,
    PhotoId,
    Timestamp,
}

#[derive(Iden)]
enum Photos {
    Table,
    PhotoId,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}
