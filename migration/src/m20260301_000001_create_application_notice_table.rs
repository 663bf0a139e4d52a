use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApplicationNotice::Table)
                    .if_not_exists()
                    .col(pk_auto(ApplicationNotice::Id))
                    .col(string(ApplicationNotice::ApplicationKey))
                    .col(string(ApplicationNotice::DiscordId))
                    .col(string(ApplicationNotice::ChannelId))
                    .col(string(ApplicationNotice::MessageId))
                    .col(timestamp(ApplicationNotice::NotifiedAt))
                    .to_owned(),
            )
            .await?;

        // One notice per application row
        manager
            .create_index(
                Index::create()
                    .name("idx_application_notice_application_key")
                    .table(ApplicationNotice::Table)
                    .col(ApplicationNotice::ApplicationKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_application_notice_application_key")
                    .table(ApplicationNotice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ApplicationNotice::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApplicationNotice {
    Table,
    Id,
    ApplicationKey,
    DiscordId,
    ChannelId,
    MessageId,
    NotifiedAt,
}
