//! Create photos table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photos::PhotoId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photos::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Photos::ImageData).blob().not_null())
                    .col(
                        ColumnDef::new(Photos::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_user")
                            .from(Photos::Table, Photos::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (profile photo lists, stream join)
        manager
            .create_index(
                Index::create()
                    .name("idx_photos_user_id")
                    .table(Photos::Table)
                    .col(Photos::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Photos {
    Table,
    PhotoId,
    UserId,
    ImageData,
    Timestamp,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}
