use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::order::{round_cents, Order};
use crate::store::{date, format_date, integer, number, text, Record, Sheet};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionEntry {
    pub date: Option<NaiveDate>,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Sheet for ProductionEntry {
    const NAME: &'static str = "producao";
    const COLUMNS: &'static [&'static str] = &["Data", "Cartelas", "Observações"];

    fn from_record(record: &Record) -> Self {
        let notes = text(record, "Observações");

        Self {
            date: date(record, "Data"),
            quantity: integer(record, "Cartelas"),
            notes: if notes.is_empty() { None } else { Some(notes) },
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("Data".into(), format_date(self.date));
        record.insert("Cartelas".into(), json!(self.quantity));
        record.insert(
            "Observações".into(),
            Value::String(self.notes.clone().unwrap_or_default()),
        );
        record
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub value: f64,
}

impl Sheet for CostEntry {
    const NAME: &'static str = "custos";
    const COLUMNS: &'static [&'static str] = &["Data", "Descrição", "Valor"];

    fn from_record(record: &Record) -> Self {
        Self {
            date: date(record, "Data"),
            description: text(record, "Descrição"),
            value: number(record, "Valor"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("Data".into(), format_date(self.date));
        record.insert("Descrição".into(), Value::String(self.description.clone()));
        record.insert("Valor".into(), json!(self.value));
        record
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub produced: i64,
    pub orders: usize,
    pub sold: i64,
    pub revenue: f64,
    pub received: f64,
    pub costs: f64,
    pub profit: f64,
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Groups every dated entry by calendar month. Undated rows are left out.
pub fn monthly_summaries(
    production: &[ProductionEntry],
    costs: &[CostEntry],
    orders: &[Order],
) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, MonthlySummary> = BTreeMap::new();

    for entry in production {
        if let Some(date) = entry.date {
            summary_for(&mut months, date).produced += entry.quantity;
        }
    }

    for entry in costs {
        if let Some(date) = entry.date {
            summary_for(&mut months, date).costs += entry.value;
        }
    }

    for order in orders {
        if let Some(date) = order.date {
            let summary = summary_for(&mut months, date);
            summary.orders += 1;
            summary.sold += order.quantity;
            summary.revenue += order.total_value;
            if order.paid {
                summary.received += order.total_value;
            }
        }
    }

    months
        .into_values()
        .map(|mut summary| {
            summary.revenue = round_cents(summary.revenue);
            summary.received = round_cents(summary.received);
            summary.costs = round_cents(summary.costs);
            summary.profit = round_cents(summary.revenue - summary.costs);
            summary
        })
        .collect()
}

fn summary_for(months: &mut BTreeMap<String, MonthlySummary>, date: NaiveDate) -> &mut MonthlySummary {
    let key = month_key(date);

    months.entry(key.clone()).or_insert_with(|| MonthlySummary {
        month: key,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PaymentMethod;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn entries_are_grouped_by_month_in_order() {
        let production = vec![
            ProductionEntry { date: Some(day(2025, 2, 1)), quantity: 40, notes: None },
            ProductionEntry { date: Some(day(2025, 1, 3)), quantity: 30, notes: None },
            ProductionEntry { date: Some(day(2025, 1, 20)), quantity: 10, notes: None },
        ];
        let costs = vec![
            CostEntry { date: Some(day(2025, 1, 5)), description: "ração".into(), value: 20.25 },
            CostEntry { date: None, description: "sem data".into(), value: 999.0 },
        ];
        let orders = vec![
            Order::new(day(2025, 1, 10), "Bob".into(), 2, 15.0, PaymentMethod::Pix, true),
            Order::new(day(2025, 1, 11), "Carol".into(), 1, 15.0, PaymentMethod::Dinheiro, false),
        ];

        let summaries = monthly_summaries(&production, &costs, &orders);

        assert_eq!(summaries.len(), 2);

        let january = &summaries[0];
        assert_eq!(january.month, "2025-01");
        assert_eq!(january.produced, 40);
        assert_eq!(january.orders, 2);
        assert_eq!(january.sold, 3);
        assert_eq!(january.revenue, 45.0);
        assert_eq!(january.received, 30.0);
        assert_eq!(january.costs, 20.25);
        assert_eq!(january.profit, 24.75);

        let february = &summaries[1];
        assert_eq!(february.month, "2025-02");
        assert_eq!(february.produced, 40);
        assert_eq!(february.orders, 0);
        assert_eq!(february.profit, 0.0);
    }

    #[test]
    fn nothing_recorded_means_no_months() {
        assert!(monthly_summaries(&[], &[], &[]).is_empty());
    }
}
