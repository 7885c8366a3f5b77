use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{text, Record, Sheet};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            notes: None,
        }
    }
}

impl Sheet for Customer {
    const NAME: &'static str = "clientes";
    const COLUMNS: &'static [&'static str] = &["Nome", "Endereço", "Observações"];

    fn from_record(record: &Record) -> Self {
        let notes = text(record, "Observações");

        Self {
            name: text(record, "Nome"),
            address: text(record, "Endereço"),
            notes: if notes.is_empty() { None } else { Some(notes) },
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("Nome".into(), Value::String(self.name.clone()));
        record.insert("Endereço".into(), Value::String(self.address.clone()));
        record.insert(
            "Observações".into(),
            Value::String(self.notes.clone().unwrap_or_default()),
        );
        record
    }
}
