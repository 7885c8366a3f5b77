mod handlers;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post, put},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::Error;
use crate::server::handlers::{customers, ledger, orders, routes};

pub use session::{Session, SESSION_HEADER};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/customers", post(customers::create).get(customers::list))
        .route("/customers/:name", get(customers::find))
        .route("/orders", post(orders::create).get(orders::list))
        .route("/orders/:index", patch(orders::update))
        .route("/production", post(ledger::record_production).get(ledger::list_production))
        .route("/costs", post(ledger::record_cost).get(ledger::list_costs))
        .route("/reports/monthly", get(ledger::monthly_report))
        .route("/route", post(routes::generate).get(routes::current))
        .route("/route/selection", put(routes::select))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(Error::server_error)
}
