use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::Customer;
use crate::error::Error;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(customer): Json<Customer>,
) -> Result<Json<Customer>, Error> {
    let customer = api.register_customer(customer).await?;

    Ok(customer.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Customer>>, Error> {
    let customers = api.list_customers().await?;

    Ok(customers.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(name): Path<String>,
) -> Result<Json<Customer>, Error> {
    let customer = api.find_customer(&name).await?;

    Ok(customer.into())
}
