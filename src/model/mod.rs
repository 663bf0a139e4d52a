//! Domain models shared by commands, services and repositories.

pub mod application;
pub mod application_notice;
pub mod deck;
pub mod deck_topic_archive;
pub mod document;
pub mod embed;
pub mod game;
pub mod protocol;
