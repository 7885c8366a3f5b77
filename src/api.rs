use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{CostEntry, Customer, MonthlySummary, Order, PaymentMethod, ProductionEntry};
use crate::error::Error;
use crate::planner::{RouteState, RouteView};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewOrder {
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub customer: String,
    pub quantity: i64,
    pub base_value: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrderChanges {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub paid: Option<bool>,
}

#[async_trait]
pub trait CustomerAPI {
    async fn register_customer(&self, customer: Customer) -> Result<Customer, Error>;
    async fn list_customers(&self) -> Result<Vec<Customer>, Error>;
    async fn find_customer(&self, name: &str) -> Result<Customer, Error>;
}

#[async_trait]
pub trait OrderAPI {
    async fn create_order(&self, order: NewOrder) -> Result<Order, Error>;
    async fn list_orders(&self) -> Result<Vec<Order>, Error>;
    async fn update_order(&self, index: usize, changes: OrderChanges) -> Result<Order, Error>;
}

#[async_trait]
pub trait LedgerAPI {
    async fn record_production(&self, entry: ProductionEntry) -> Result<ProductionEntry, Error>;
    async fn list_production(&self) -> Result<Vec<ProductionEntry>, Error>;
    async fn record_cost(&self, entry: CostEntry) -> Result<CostEntry, Error>;
    async fn list_costs(&self) -> Result<Vec<CostEntry>, Error>;
    async fn monthly_report(&self) -> Result<Vec<MonthlySummary>, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn select_stops(&self, session: Uuid, customers: Vec<String>) -> Result<RouteState, Error>;
    async fn generate_route(
        &self,
        session: Uuid,
        origin: Option<String>,
        customers: Vec<String>,
    ) -> Result<RouteView, Error>;
    async fn current_route(&self, session: Uuid) -> Result<Option<RouteView>, Error>;
}

pub trait API: CustomerAPI + OrderAPI + LedgerAPI + RouteAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
