use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::error::Error;
use crate::planner::{RouteState, RouteView};
use crate::server::Session;

#[derive(Serialize, Deserialize)]
pub struct GenerateParams {
    #[serde(default)]
    origin: Option<String>,
    customers: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SelectParams {
    customers: Vec<String>,
}

#[derive(Serialize)]
pub struct SelectResponse {
    state: RouteState,
}

pub async fn generate(
    Extension(api): Extension<DynAPI>,
    Session(session): Session,
    Json(params): Json<GenerateParams>,
) -> Result<Json<RouteView>, Error> {
    let view = api
        .generate_route(session, params.origin, params.customers)
        .await?;

    Ok(view.into())
}

pub async fn current(
    Extension(api): Extension<DynAPI>,
    Session(session): Session,
) -> Result<Json<RouteView>, Error> {
    let view = api
        .current_route(session)
        .await?
        .ok_or_else(|| Error::not_found_error("no route generated for this session"))?;

    Ok(view.into())
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Session(session): Session,
    Json(params): Json<SelectParams>,
) -> Result<Json<SelectResponse>, Error> {
    let state = api.select_stops(session, params.customers).await?;

    Ok(SelectResponse { state }.into())
}
