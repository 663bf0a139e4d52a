pub mod prelude;

pub mod application_notice;
pub mod deck_topic_archive;
