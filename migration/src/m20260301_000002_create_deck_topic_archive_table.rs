use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeckTopicArchive::Table)
                    .if_not_exists()
                    .col(pk_auto(DeckTopicArchive::Id))
                    .col(string(DeckTopicArchive::DeckId))
                    .col(string(DeckTopicArchive::ChannelId))
                    .col(text(DeckTopicArchive::Topic))
                    .col(timestamp(DeckTopicArchive::ArchivedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deck_topic_archive_deck_id")
                    .table(DeckTopicArchive::Table)
                    .col(DeckTopicArchive::DeckId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_deck_topic_archive_deck_id")
                    .table(DeckTopicArchive::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(DeckTopicArchive::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeckTopicArchive {
    Table,
    Id,
    DeckId,
    ChannelId,
    Topic,
    ArchivedAt,
}
