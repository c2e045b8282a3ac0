//! Create bans table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bans::BanId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bans::BannedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Bans::BannedUser).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Bans::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bans_banned_by")
                            .from(Bans::Table, Bans::BannedBy)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bans_banned_user")
                            .from(Bans::Table, Bans::BannedUser)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (banned_by, banned_user) - one active ban per ordered pair
        manager
            .create_index(
                Index::create()
                    .name("idx_bans_banned_by_banned_user")
                    .table(Bans::Table)
                    .col(Bans::BannedBy)
                    .col(Bans::BannedUser)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: banned_user (reverse lookups for the user directory)
        manager
            .create_index(
                Index::create()
                    .name("idx_bans_banned_user")
                    .table(Bans::Table)
                    .col(Bans::BannedUser)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bans {
    Table,
    BanId,
    BannedBy,
    BannedUser,
    Timestamp,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}
