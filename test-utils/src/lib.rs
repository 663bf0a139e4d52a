//! Kenken Test Utils
//!
//! Shared testing utilities for the bot: a builder for test contexts backed by an
//! in-memory SQLite database, row factories for the bot's tables, and factories
//! for serenity model objects.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn remembers_notices() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_notices().build().await?;
//!     let notice = factory::create_application_notice(test.db()).await?;
//!     // Query the repository under test...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
