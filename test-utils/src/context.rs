use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

const MEMORY_URL: &str = "sqlite::memory:";

/// A private in-memory SQLite database, dropped with the context.
pub struct TestContext {
    db: DatabaseConnection,
}

impl TestContext {
    /// Connects and runs `tables` in order.
    pub async fn connect(tables: &[TableCreateStatement]) -> Result<Self, TestError> {
        let db = Database::connect(MEMORY_URL).await?;
        for table in tables {
            db.execute(table).await?;
        }
        Ok(Self { db })
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
