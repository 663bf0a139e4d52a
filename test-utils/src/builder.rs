use entity::prelude::{ApplicationNotice, DeckTopicArchive};
use sea_orm::{sea_query::TableCreateStatement, DbBackend, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Collects the tables a test needs, then opens the database.
///
/// ```rust,ignore
/// let test = TestBuilder::new().with_archives().build().await?;
/// let repo = DeckTopicArchiveRepository::new(test.db());
/// ```
#[derive(Default)]
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the table of any SeaORM entity.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the table of announced membership applications.
    pub fn with_notices(self) -> Self {
        self.with_table(ApplicationNotice)
    }

    /// Adds the table of archived deck topics.
    pub fn with_archives(self) -> Self {
        self.with_table(DeckTopicArchive)
    }

    /// Opens a fresh in-memory database with the collected tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Database ready for use
    /// - `Err(TestError::Database)` - Connecting or creating a table failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        TestContext::connect(&self.tables).await
    }
}
