use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, integer, string, timestamp_with_time_zone},
    sea_query,
};

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
    CreatedAt,
    ExternalAddress,
    ExternalRound,
    MaxTasksPerNode,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(big_integer(Rounds::Id))
                    .col(timestamp_with_time_zone(Rounds::CreatedAt))
                    .col(string(Rounds::ExternalAddress))
                    .col(big_integer(Rounds::ExternalRound))
                    .col(integer(Rounds::MaxTasksPerNode))
                    .primary_key(Index::create().col(Rounds::Id))
                    .to_owned(),
            )
            .await?;

        // Composite index for lookup by (external_address, external_round)
        manager
            .create_index(
                Index::create()
                    .name("idx_rounds_external_address_round")
                    .table(Rounds::Table)
                    .col(Rounds::ExternalAddress)
                    .col(Rounds::ExternalRound)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rounds::Table).if_exists().to_owned())
            .await
    }
}
