use axum::extract::{Extension, Json, Path};

use crate::api::{DynAPI, NewOrder, OrderChanges};
use crate::entities::Order;
use crate::error::Error;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<NewOrder>,
) -> Result<Json<Order>, Error> {
    let order = api.create_order(params).await?;

    Ok(order.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Order>>, Error> {
    let orders = api.list_orders().await?;

    Ok(orders.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(index): Path<usize>,
    Json(changes): Json<OrderChanges>,
) -> Result<Json<Order>, Error> {
    let order = api.update_order(index, changes).await?;

    Ok(order.into())
}
