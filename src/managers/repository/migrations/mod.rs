use sea_orm_migration::{MigrationTrait, MigratorTrait, async_trait::async_trait};

mod m001_create_contract_versions;
mod m002_create_rounds;
mod m003_create_eligible_items;
mod m004_create_tasks;

pub struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_contract_versions::Migration),
            Box::new(m002_create_rounds::Migration),
            Box::new(m003_create_eligible_items::Migration),
            Box::new(m004_create_tasks::Migration),
        ]
    }
}
