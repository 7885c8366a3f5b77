mod customer;
mod ledger;
mod location;
mod order;
mod route;

pub use customer::Customer;
pub use ledger::{monthly_summaries, CostEntry, MonthlySummary, ProductionEntry};
pub use location::Coordinates;
pub use order::{order_total, PaymentMethod, Order};
pub use route::{RoutePlan, RouteRequest, Waypoint};
