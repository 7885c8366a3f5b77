use super::Engine;

use async_trait::async_trait;

use crate::{
    api::CustomerAPI,
    entities::Customer,
    error::Error,
    store::{append_sheet_row, read_sheet},
};

#[async_trait]
impl CustomerAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn register_customer(&self, customer: Customer) -> Result<Customer, Error> {
        let name = customer.name.trim();
        let address = customer.address.trim();

        if name.is_empty() {
            return Err(Error::validation_error("customer name is required"));
        }
        if address.is_empty() {
            return Err(Error::validation_error("customer address is required"));
        }

        let existing = self.list_customers().await?;
        if existing.iter().any(|c| c.name == name) {
            return Err(Error::validation_error(format!(
                "customer {:?} is already registered",
                name
            )));
        }

        let customer = Customer {
            name: name.to_string(),
            address: address.to_string(),
            notes: customer
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        append_sheet_row(&*self.store, &customer).await?;

        tracing::info!("registered customer {:?}", customer.name);

        Ok(customer)
    }

    #[tracing::instrument(skip(self))]
    async fn list_customers(&self) -> Result<Vec<Customer>, Error> {
        let customers: Vec<Customer> = read_sheet(&*self.store).await?;

        Ok(customers.into_iter().filter(|c| !c.name.is_empty()).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_customer(&self, name: &str) -> Result<Customer, Error> {
        self.list_customers()
            .await?
            .into_iter()
            .find(|c| c.name == name.trim())
            .ok_or_else(|| Error::not_found_error(format!("customer {:?} not found", name)))
    }
}
