use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, string},
    sea_query,
};

#[derive(Iden)]
enum ContractVersions {
    Table,
    ContractAddress,
    RoundOffset,
    LastInternalRound,
    FirstInternalRound,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContractVersions::Table)
                    .if_not_exists()
                    .col(string(ContractVersions::ContractAddress))
                    .col(big_integer(ContractVersions::RoundOffset))
                    .col(big_integer(ContractVersions::LastInternalRound))
                    .col(big_integer(ContractVersions::FirstInternalRound))
                    .primary_key(Index::create().col(ContractVersions::ContractAddress))
                    .to_owned(),
            )
            .await?;

        // Index for the "current version" lookup ordering by last_internal_round
        manager
            .create_index(
                Index::create()
                    .name("idx_contract_versions_last_internal_round")
                    .table(ContractVersions::Table)
                    .col(ContractVersions::LastInternalRound)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ContractVersions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
