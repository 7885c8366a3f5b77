mod customer_api;
mod ledger_api;
mod order_api;
mod route_api;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::API,
    external::{DynDirections, DynGeocoder},
    planner::{RouteCache, RouteState},
    store::DynStore,
};

type SessionCache = Arc<Mutex<RouteCache>>;

pub struct Engine {
    store: DynStore,
    geocoder: DynGeocoder,
    directions: DynDirections,
    default_origin: Option<String>,
    sessions: Mutex<HashMap<Uuid, SessionCache>>,
    orders: Mutex<()>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(
        store: DynStore,
        geocoder: DynGeocoder,
        directions: DynDirections,
        default_origin: Option<String>,
    ) -> Self {
        Self {
            store,
            geocoder,
            directions,
            default_origin,
            sessions: Mutex::new(HashMap::new()),
            orders: Mutex::new(()),
        }
    }

    /// The route cache of one session, created on first use. Holding its
    /// lock serializes route actions of that session only.
    async fn session(&self, id: Uuid) -> SessionCache {
        self.sessions
            .lock()
            .await
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(RouteCache::new())))
            .clone()
    }

    async fn existing_session(&self, id: Uuid) -> Option<SessionCache> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Forgets a session whose cache holds no plan. Callers must have dropped
    /// their own handle; a cache still held elsewhere is kept.
    async fn release_if_idle(&self, id: Uuid) {
        let mut sessions = self.sessions.lock().await;

        let idle = match sessions.get(&id) {
            Some(cache) if Arc::strong_count(cache) == 1 => cache
                .try_lock()
                .map(|cache| cache.state() == RouteState::Idle)
                .unwrap_or(false),
            _ => false,
        };

        if idle {
            sessions.remove(&id);
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl API for Engine {}
