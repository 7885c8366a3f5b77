use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{postgres::PgPoolOptions, types::Json, Executor, Pool, Postgres, Row, Transaction};

use super::{columns_of, Record, Table, TableStore};
use crate::error::Error;

type Database = Postgres;

/// Spreadsheet-like tables kept in two Postgres relations: one header row per
/// sheet and one JSONB document per data row.
pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS sheets (name VARCHAR PRIMARY KEY, columns JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS sheet_rows (sheet VARCHAR NOT NULL REFERENCES sheets(name), position INT4 NOT NULL, data JSONB NOT NULL, PRIMARY KEY (sheet, position))")
            .await?;

        Ok(Self { pool })
    }
}

/// Creates the sheet if needed and locks its header row until `tx` ends, so
/// writers to the same sheet take turns.
#[tracing::instrument(skip(tx))]
async fn ensure_sheet(
    tx: &mut Transaction<'_, Database>,
    name: &str,
    columns: &[String],
) -> Result<Vec<String>, Error> {
    (&mut *tx)
        .execute(
            sqlx::query("INSERT INTO sheets (name, columns) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .bind(Json(columns)),
        )
        .await?;

    let Json(columns): Json<Vec<String>> = (&mut *tx)
        .fetch_one(sqlx::query("SELECT columns FROM sheets WHERE name = $1 FOR UPDATE").bind(name))
        .await?
        .try_get("columns")?;

    Ok(columns)
}

#[async_trait]
impl TableStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn get_table(&self, name: &str, default_columns: &[&str]) -> Result<Table, Error> {
        let mut tx = self.pool.begin().await?;

        let default_columns: Vec<String> = default_columns.iter().map(|c| c.to_string()).collect();
        let columns = ensure_sheet(&mut tx, name, &default_columns).await?;

        let mut rows = Vec::new();
        {
            let mut results = (&mut tx).fetch(
                sqlx::query("SELECT data FROM sheet_rows WHERE sheet = $1 ORDER BY position")
                    .bind(name),
            );

            while let Some(row) = results.try_next().await? {
                let Json(record): Json<Record> = row.try_get("data")?;
                rows.push(record);
            }
        }

        tx.commit().await?;

        Ok(Table { columns, rows })
    }

    #[tracing::instrument(skip(self, row))]
    async fn append_row(&self, name: &str, row: Record) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        ensure_sheet(&mut tx, name, &columns_of(&row)).await?;

        tx.execute(
            sqlx::query(
                "INSERT INTO sheet_rows (sheet, position, data) SELECT $1, COALESCE(MAX(position) + 1, 0), $2 FROM sheet_rows WHERE sheet = $1",
            )
            .bind(name)
            .bind(Json(&row)),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, rows))]
    async fn overwrite_table(&self, name: &str, rows: Vec<Record>) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        let columns = rows.first().map(columns_of).unwrap_or_default();
        ensure_sheet(&mut tx, name, &columns).await?;

        tx.execute(sqlx::query("DELETE FROM sheet_rows WHERE sheet = $1").bind(name))
            .await?;

        for (position, row) in rows.iter().enumerate() {
            tx.execute(
                sqlx::query("INSERT INTO sheet_rows (sheet, position, data) VALUES ($1, $2, $3)")
                    .bind(name)
                    .bind(position as i32)
                    .bind(Json(row)),
            )
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
