//! Row-oriented tabular storage, shaped after a spreadsheet: every table has
//! a header row of column names and an ordered list of records.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// One row, keyed by column header.
pub type Record = Map<String, Value>;

pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

#[async_trait]
pub trait TableStore {
    /// Reads a whole table, creating it with `default_columns` as header when
    /// it does not exist yet.
    async fn get_table(&self, name: &str, default_columns: &[&str]) -> Result<Table, Error>;

    /// Appends one row; a missing table is created with the row's keys as header.
    async fn append_row(&self, name: &str, row: Record) -> Result<(), Error>;

    /// Replaces every row of the table, keeping its header.
    async fn overwrite_table(&self, name: &str, rows: Vec<Record>) -> Result<(), Error>;
}

pub type DynStore = std::sync::Arc<dyn TableStore + Send + Sync>;

/// A typed view over one table.
pub trait Sheet: Sized {
    const NAME: &'static str;
    const COLUMNS: &'static [&'static str];

    fn from_record(record: &Record) -> Self;
    fn to_record(&self) -> Record;
}

pub async fn read_sheet<S: Sheet>(store: &(dyn TableStore + Send + Sync)) -> Result<Vec<S>, Error> {
    let table = store.get_table(S::NAME, S::COLUMNS).await?;

    Ok(table.rows.iter().map(S::from_record).collect())
}

pub async fn append_sheet_row<S: Sheet>(
    store: &(dyn TableStore + Send + Sync),
    value: &S,
) -> Result<(), Error> {
    store.append_row(S::NAME, value.to_record()).await
}

pub async fn overwrite_sheet<S: Sheet>(
    store: &(dyn TableStore + Send + Sync),
    values: &[S],
) -> Result<(), Error> {
    store
        .overwrite_table(S::NAME, values.iter().map(Sheet::to_record).collect())
        .await
}

pub fn columns_of(record: &Record) -> Vec<String> {
    record.keys().cloned().collect()
}

// Cells come back either typed or as text depending on who wrote them, so the
// readers below coerce instead of failing.

pub fn text(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn number(record: &Record, column: &str) -> f64 {
    let value = match record.get(column) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub fn integer(record: &Record, column: &str) -> i64 {
    number(record, column).trunc() as i64
}

pub fn flag(record: &Record, column: &str) -> bool {
    match record.get(column) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "sim" | "true" | "1"),
        _ => false,
    }
}

pub fn date(record: &Record, column: &str) -> Option<NaiveDate> {
    let raw = text(record, column);

    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
        .ok()
}

pub fn format_date(date: Option<NaiveDate>) -> Value {
    match date {
        Some(date) => Value::String(date.format(DATE_FORMAT).to_string()),
        None => Value::String(String::new()),
    }
}

pub fn format_flag(value: bool) -> Value {
    Value::String(if value { "Sim" } else { "Não" }.into())
}
