use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "deck_topic_archive")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub deck_id: String,
    pub channel_id: String,
    #[sea_orm(column_type = "Text")]
    pub topic: String,
    pub archived_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
