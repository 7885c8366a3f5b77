use super::{today, Engine};

use async_trait::async_trait;

use crate::{
    api::{CustomerAPI, NewOrder, OrderAPI, OrderChanges},
    entities::Order,
    error::Error,
    store::{append_sheet_row, overwrite_sheet, read_sheet},
};

impl Engine {
    async fn ensure_customer(&self, name: &str) -> Result<String, Error> {
        let customers = self.list_customers().await?;

        if customers.is_empty() {
            return Err(Error::validation_error(
                "register customers before recording orders",
            ));
        }

        customers
            .into_iter()
            .find(|c| c.name == name.trim())
            .map(|c| c.name)
            .ok_or_else(|| Error::validation_error(format!("unknown customer {:?}", name)))
    }
}

#[async_trait]
impl OrderAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_order(&self, order: NewOrder) -> Result<Order, Error> {
        if order.quantity < 1 {
            return Err(Error::validation_error("quantity must be at least 1"));
        }
        if !order.base_value.is_finite() || order.base_value < 0.0 {
            return Err(Error::validation_error("base value must not be negative"));
        }

        let customer = self.ensure_customer(&order.customer).await?;

        let _guard = self.orders.lock().await;

        let order = Order::new(
            order.date.unwrap_or_else(today),
            customer,
            order.quantity,
            order.base_value,
            order.payment_method,
            order.paid,
        );

        append_sheet_row(&*self.store, &order).await?;

        tracing::info!(
            "order saved for {:?}: {} x {:.2} = {:.2}",
            order.customer,
            order.quantity,
            order.base_value,
            order.total_value
        );

        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, Error> {
        read_sheet(&*self.store).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_order(&self, index: usize, changes: OrderChanges) -> Result<Order, Error> {
        let _guard = self.orders.lock().await;

        let mut orders = self.list_orders().await?;

        let count = orders.len();
        let order = orders
            .get_mut(index)
            .ok_or_else(|| Error::not_found_error(format!("order {} not found ({} orders)", index, count)))?;

        if let Some(quantity) = changes.quantity {
            if quantity < 0 {
                return Err(Error::validation_error("quantity must not be negative"));
            }
            order.quantity = quantity;
        }
        if let Some(customer) = changes.customer {
            order.customer = self.ensure_customer(&customer).await?;
        }
        if let Some(date) = changes.date {
            order.date = Some(date);
        }
        if let Some(payment_method) = changes.payment_method {
            order.payment_method = payment_method;
        }
        if let Some(paid) = changes.paid {
            order.paid = paid;
        }
        order.recompute_total();

        let updated = order.clone();

        overwrite_sheet(&*self.store, &orders).await?;

        Ok(updated)
    }
}
