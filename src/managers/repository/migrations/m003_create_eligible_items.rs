use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{string, string_null, timestamp_with_time_zone},
    sea_query,
};

#[derive(Iden)]
enum EligibleItems {
    Table,
    ContentId,
    Protocol,
    ExpiresAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EligibleItems::Table)
                    .if_not_exists()
                    .col(string(EligibleItems::ContentId))
                    .col(string_null(EligibleItems::Protocol))
                    .col(timestamp_with_time_zone(EligibleItems::ExpiresAt))
                    .primary_key(Index::create().col(EligibleItems::ContentId))
                    .to_owned(),
            )
            .await?;

        // Index for expiry filtering during sampling and cleanup
        manager
            .create_index(
                Index::create()
                    .name("idx_eligible_items_expires_at")
                    .table(EligibleItems::Table)
                    .col(EligibleItems::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EligibleItems::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
