//! Create comments table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::CommentId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::PhotoId).string_len(32).not_null())
                    .col(ColumnDef::new(Comments::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(
                        ColumnDef::new(Comments::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // No cascade: the photo delete removes children explicitly, first.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_photo")
                            .from(Comments::Table, Comments::PhotoId)
                            .to(Photos::Table, Photos::PhotoId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (photo_id, timestamp) for newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_photo_id_timestamp")
                    .table(Comments::Table)
                    .col(Comments::PhotoId)
                    .col(Comments::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Comments {
    Table,
    CommentId,
    PhotoId,
    UserId,
    Content,
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
