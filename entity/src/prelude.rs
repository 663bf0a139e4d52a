pub use super::application_notice::Entity as ApplicationNotice;
pub use super::deck_topic_archive::Entity as DeckTopicArchive;
