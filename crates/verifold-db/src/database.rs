//! Database connection and table management.
//!
//! Provides a unified interface for LanceDB operations.

use crate::error::Result;
use crate::schema::TABLE_DISCOVERIES;
use crate::schema_arrow::discovery_schema;
use arrow_array::RecordBatchIterator;
use lancedb::connection::Connection;
use std::path::Path;

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
    path: String,
}

impl Database {
    /// Open or create a database at the specified path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        // Create directory if it doesn't exist
        if !path.as_ref().exists() {
            std::fs::create_dir_all(path.as_ref())?;
        }

        let conn = lancedb::connect(&path_str).execute().await?;

        Ok(Self {
            conn,
            path: path_str,
        })
    }

    /// Get the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Initialize the ledger table if it doesn't exist.
    ///
    /// LanceDB requires initial data to create a table with a schema,
    /// so creation uses an empty iterator over the discovery schema.
    pub async fn initialize(&self) -> Result<()> {
        if !self.table_exists(TABLE_DISCOVERIES).await? {
            let schema = discovery_schema();
            let empty_iter = RecordBatchIterator::new(vec![], schema);
            self.conn
                .create_table(TABLE_DISCOVERIES, empty_iter)
                .execute()
                .await?;
        }
        Ok(())
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let tables = self.conn.table_names().execute().await?;
        Ok(tables.contains(&name.to_string()))
    }

    /// Compact and optimize all tables.
    pub async fn optimize(&self) -> Result<()> {
        let tables = self.conn.table_names().execute().await?;

        for table_name in tables {
            let table = self.conn.open_table(&table_name).execute().await?;
            table
                .optimize(lancedb::table::OptimizeAction::default())
                .await?;
        }

        Ok(())
    }
}
