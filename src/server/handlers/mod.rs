pub mod customers;
pub mod ledger;
pub mod orders;
pub mod routes;
