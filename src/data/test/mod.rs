mod application_notice;
mod deck_topic_archive;
