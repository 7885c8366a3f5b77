use axum::extract::{Extension, Json};

use crate::api::DynAPI;
use crate::entities::{CostEntry, MonthlySummary, ProductionEntry};
use crate::error::Error;

pub async fn record_production(
    Extension(api): Extension<DynAPI>,
    Json(entry): Json<ProductionEntry>,
) -> Result<Json<ProductionEntry>, Error> {
    let entry = api.record_production(entry).await?;

    Ok(entry.into())
}

pub async fn list_production(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Vec<ProductionEntry>>, Error> {
    let entries = api.list_production().await?;

    Ok(entries.into())
}

pub async fn record_cost(
    Extension(api): Extension<DynAPI>,
    Json(entry): Json<CostEntry>,
) -> Result<Json<CostEntry>, Error> {
    let entry = api.record_cost(entry).await?;

    Ok(entry.into())
}

pub async fn list_costs(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<CostEntry>>, Error> {
    let entries = api.list_costs().await?;

    Ok(entries.into())
}

pub async fn monthly_report(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Vec<MonthlySummary>>, Error> {
    let report = api.monthly_report().await?;

    Ok(report.into())
}
