use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{columns_of, Record, Table, TableStore};
use crate::error::Error;

/// Keeps every table in process memory. Used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn get_table(&self, name: &str, default_columns: &[&str]) -> Result<Table, Error> {
        let mut tables = self.tables.lock().await;

        let table = tables.entry(name.to_string()).or_insert_with(|| Table {
            columns: default_columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        });

        Ok(table.clone())
    }

    #[tracing::instrument(skip(self, row))]
    async fn append_row(&self, name: &str, row: Record) -> Result<(), Error> {
        let mut tables = self.tables.lock().await;

        let table = tables.entry(name.to_string()).or_insert_with(|| Table {
            columns: columns_of(&row),
            rows: Vec::new(),
        });
        table.rows.push(row);

        Ok(())
    }

    #[tracing::instrument(skip(self, rows))]
    async fn overwrite_table(&self, name: &str, rows: Vec<Record>) -> Result<(), Error> {
        let mut tables = self.tables.lock().await;

        let columns = rows.first().map(columns_of).unwrap_or_default();
        let table = tables
            .entry(name.to_string())
            .or_insert_with(|| Table {
                columns,
                rows: Vec::new(),
            });
        table.rows = rows;

        Ok(())
    }
}
