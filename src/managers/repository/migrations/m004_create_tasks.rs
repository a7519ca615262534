use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{
        DbErr, DeriveMigrationName, ForeignKey, Iden, Index, MigrationTrait, SchemaManager, Table,
    },
    schema::{big_integer, string, string_null},
    sea_query,
};

#[derive(Iden)]
enum Tasks {
    Table,
    RoundId,
    ContentId,
    Protocol,
}

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(big_integer(Tasks::RoundId))
                    .col(string(Tasks::ContentId))
                    .col(string_null(Tasks::Protocol))
                    .primary_key(Index::create().col(Tasks::RoundId).col(Tasks::ContentId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_round_id")
                            .from(Tasks::Table, Tasks::RoundId)
                            .to(Rounds::Table, Rounds::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).if_exists().to_owned())
            .await
    }
}
