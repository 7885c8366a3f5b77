use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::{date, flag, format_date, format_flag, integer, number, text, Record, Sheet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Dinheiro,
    #[serde(rename = "Cartão")]
    Cartao,
    Pix,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dinheiro => "Dinheiro",
            Self::Cartao => "Cartão",
            Self::Pix => "Pix",
        }
    }

    /// Unknown spellings fall back to cash, the first option on the form.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim() {
            "Cartão" | "Cartao" => Self::Cartao,
            "Pix" => Self::Pix,
            _ => Self::Dinheiro,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Dinheiro
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub date: Option<NaiveDate>,
    pub customer: String,
    pub quantity: i64,
    pub base_value: f64,
    pub total_value: f64,
    pub payment_method: PaymentMethod,
    pub paid: bool,
}

impl Order {
    pub fn new(
        date: NaiveDate,
        customer: String,
        quantity: i64,
        base_value: f64,
        payment_method: PaymentMethod,
        paid: bool,
    ) -> Self {
        Self {
            date: Some(date),
            customer,
            quantity,
            base_value,
            total_value: order_total(quantity, base_value),
            payment_method,
            paid,
        }
    }

    pub fn recompute_total(&mut self) {
        self.total_value = order_total(self.quantity, self.base_value);
    }
}

pub fn order_total(quantity: i64, base_value: f64) -> f64 {
    round_cents(quantity as f64 * base_value)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Sheet for Order {
    const NAME: &'static str = "pedidos";
    const COLUMNS: &'static [&'static str] = &[
        "Pago",
        "Data",
        "Cliente",
        "Qt Cartelas",
        "Valor Base",
        "Valor Total",
        "Forma de Pagamento",
    ];

    fn from_record(record: &Record) -> Self {
        Self {
            date: date(record, "Data"),
            customer: text(record, "Cliente"),
            quantity: integer(record, "Qt Cartelas"),
            base_value: number(record, "Valor Base"),
            total_value: number(record, "Valor Total"),
            payment_method: PaymentMethod::parse_lenient(&text(record, "Forma de Pagamento")),
            paid: flag(record, "Pago"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("Pago".into(), format_flag(self.paid));
        record.insert("Data".into(), format_date(self.date));
        record.insert("Cliente".into(), Value::String(self.customer.clone()));
        record.insert("Qt Cartelas".into(), json!(self.quantity));
        record.insert("Valor Base".into(), json!(self.base_value));
        record.insert("Valor Total".into(), json!(self.total_value));
        record.insert(
            "Forma de Pagamento".into(),
            Value::String(self.payment_method.label().into()),
        );
        record
    }
}
