pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_application_notice_table;
mod m20260301_000002_create_deck_topic_archive_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_application_notice_table::Migration),
            Box::new(m20260301_000002_create_deck_topic_archive_table::Migration),
        ]
    }
}
