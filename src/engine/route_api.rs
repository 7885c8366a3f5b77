use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{CustomerAPI, RouteAPI},
    entities::{Customer, RouteRequest},
    error::Error,
    planner::{self, render, RouteState, RouteView},
};

impl Engine {
    /// Looks customers up by name, keeping the order they were selected in.
    async fn selected_customers(&self, names: &[String]) -> Result<Vec<Customer>, Error> {
        let customers = self.list_customers().await?;
        let mut selected: Vec<Customer> = Vec::with_capacity(names.len());

        for name in names {
            let name = name.trim();

            if selected.iter().any(|c| c.name == name) {
                return Err(Error::validation_error(format!(
                    "customer {:?} selected twice",
                    name
                )));
            }

            let customer = customers
                .iter()
                .find(|c| c.name == name)
                .cloned()
                .ok_or_else(|| Error::not_found_error(format!("customer {:?} not found", name)))?;

            selected.push(customer);
        }

        Ok(selected)
    }
}

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn select_stops(&self, session: Uuid, customers: Vec<String>) -> Result<RouteState, Error> {
        let cache = match self.existing_session(session).await {
            Some(cache) => cache,
            None => return Ok(RouteState::Idle),
        };

        let state = {
            let mut cache = cache.lock().await;

            if cache.select(&customers) {
                tracing::debug!("selection changed, cached route dropped");
            }

            cache.state()
        };
        drop(cache);

        self.release_if_idle(session).await;

        Ok(state)
    }

    #[tracing::instrument(skip(self))]
    async fn generate_route(
        &self,
        session: Uuid,
        origin: Option<String>,
        customers: Vec<String>,
    ) -> Result<RouteView, Error> {
        let origin_address = origin
            .filter(|o| !o.trim().is_empty())
            .or_else(|| self.default_origin.clone())
            .ok_or_else(|| Error::validation_error("origin address is required"))?;

        let request = RouteRequest {
            origin_address,
            stops: self.selected_customers(&customers).await?,
        };

        let cache = self.session(session).await;

        let view = {
            let mut cache = cache.lock().await;

            planner::generate(&mut cache, &*self.geocoder, &*self.directions, &request)
                .await
                .map(render)
        };
        drop(cache);

        if view.is_err() {
            self.release_if_idle(session).await;
        }

        view.map_err(Error::from)
    }

    #[tracing::instrument(skip(self))]
    async fn current_route(&self, session: Uuid) -> Result<Option<RouteView>, Error> {
        let cache = match self.existing_session(session).await {
            Some(cache) => cache,
            None => return Ok(None),
        };
        let cache = cache.lock().await;

        Ok(cache.plan().map(render))
    }
}
