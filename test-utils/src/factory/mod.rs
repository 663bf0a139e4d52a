//! Factory methods for creating test rows.
//!
//! Each table has a `Factory` struct for customization and a `create_*`
//! convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let notice = factory::create_application_notice(&db).await?;
//!
//! let archive = factory::deck_topic_archive::DeckTopicArchiveFactory::new(&db)
//!     .deck_id("a1c2")
//!     .topic("*id: a1c2\n매니저: <@1>")
//!     .build()
//!     .await?;
//! ```

pub mod application_notice;
pub mod deck_topic_archive;
pub mod helpers;

pub use application_notice::create_application_notice;
pub use deck_topic_archive::create_deck_topic_archive;
