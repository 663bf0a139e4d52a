use crate::{
    data::deck_topic_archive::DeckTopicArchiveRepository, error::AppError,
    model::deck_topic_archive::CreateDeckTopicArchiveParam,
};
use test_utils::builder::TestBuilder;

mod create;
mod get_recent_by_channel;
