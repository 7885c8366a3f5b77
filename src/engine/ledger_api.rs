use super::{today, Engine};

use async_trait::async_trait;

use crate::{
    api::{LedgerAPI, OrderAPI},
    entities::{monthly_summaries, CostEntry, MonthlySummary, ProductionEntry},
    error::Error,
    store::{append_sheet_row, read_sheet},
};

#[async_trait]
impl LedgerAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn record_production(&self, entry: ProductionEntry) -> Result<ProductionEntry, Error> {
        if entry.quantity < 0 {
            return Err(Error::validation_error("produced quantity must not be negative"));
        }

        let entry = ProductionEntry {
            date: entry.date.or_else(|| Some(today())),
            quantity: entry.quantity,
            notes: entry
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        append_sheet_row(&*self.store, &entry).await?;

        Ok(entry)
    }

    #[tracing::instrument(skip(self))]
    async fn list_production(&self) -> Result<Vec<ProductionEntry>, Error> {
        read_sheet(&*self.store).await
    }

    #[tracing::instrument(skip(self))]
    async fn record_cost(&self, entry: CostEntry) -> Result<CostEntry, Error> {
        let description = entry.description.trim().to_string();

        if description.is_empty() {
            return Err(Error::validation_error("cost description is required"));
        }
        if !entry.value.is_finite() || entry.value < 0.0 {
            return Err(Error::validation_error("cost value must not be negative"));
        }

        let entry = CostEntry {
            date: entry.date.or_else(|| Some(today())),
            description,
            value: entry.value,
        };

        append_sheet_row(&*self.store, &entry).await?;

        Ok(entry)
    }

    #[tracing::instrument(skip(self))]
    async fn list_costs(&self) -> Result<Vec<CostEntry>, Error> {
        read_sheet(&*self.store).await
    }

    #[tracing::instrument(skip(self))]
    async fn monthly_report(&self) -> Result<Vec<MonthlySummary>, Error> {
        let production = self.list_production().await?;
        let costs = self.list_costs().await?;
        let orders = self.list_orders().await?;

        Ok(monthly_summaries(&production, &costs, &orders))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::api::{CustomerAPI, LedgerAPI, NewOrder, OrderAPI};
    use crate::engine::testing::engine;
    use crate::entities::{CostEntry, Customer, PaymentMethod, ProductionEntry};

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 4, d)
    }

    #[tokio::test]
    async fn undated_entries_default_to_today() {
        let engine = engine();

        let entry = engine
            .record_production(ProductionEntry {
                date: None,
                quantity: 12,
                notes: None,
            })
            .await
            .unwrap();

        assert!(entry.date.is_some());
        assert_eq!(engine.list_production().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn invalid_costs_are_rejected() {
        let engine = engine();

        let blank = CostEntry {
            date: day(1),
            description: "  ".into(),
            value: 3.0,
        };
        let negative = CostEntry {
            date: day(1),
            description: "ração".into(),
            value: -3.0,
        };

        assert!(engine.record_cost(blank).await.is_err());
        assert!(engine.record_cost(negative).await.is_err());
        assert!(engine.list_costs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn monthly_report_combines_all_tabs() {
        let engine = engine();
        engine
            .register_customer(Customer::new("Bob", "Rua 1"))
            .await
            .unwrap();

        engine
            .record_production(ProductionEntry {
                date: day(2),
                quantity: 50,
                notes: Some("lote A".into()),
            })
            .await
            .unwrap();
        engine
            .record_cost(CostEntry {
                date: day(3),
                description: "ração".into(),
                value: 35.5,
            })
            .await
            .unwrap();
        engine
            .create_order(NewOrder {
                date: day(4),
                customer: "Bob".into(),
                quantity: 4,
                base_value: 15.0,
                payment_method: PaymentMethod::Dinheiro,
                paid: true,
            })
            .await
            .unwrap();

        let report = engine.monthly_report().await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].month, "2025-04");
        assert_eq!(report[0].produced, 50);
        assert_eq!(report[0].sold, 4);
        assert_eq!(report[0].revenue, 60.0);
        assert_eq!(report[0].received, 60.0);
        assert_eq!(report[0].costs, 35.5);
        assert_eq!(report[0].profit, 24.5);
    }
}
