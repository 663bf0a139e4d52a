//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models so
//! that the rest of the bot never touches entities directly.

pub mod application_notice;
pub mod deck_topic_archive;

#[cfg(test)]
mod test;
