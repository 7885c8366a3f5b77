use std::sync::Arc;

use granja::config::Config;
use granja::engine::Engine;
use granja::error::Error;
use granja::external::OpenRouteService;
use granja::server::serve;
use granja::store::{DynStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    let store: DynStore = match &config.database {
        Some(database) => Arc::new(PgStore::new(&database.url, database.max_connections).await?),
        None => Arc::new(MemoryStore::new()),
    };

    let routing = Arc::new(OpenRouteService::new(&config.routing)?);

    let engine = Engine::new(store, routing.clone(), routing, config.default_origin.clone());

    serve(engine, config.listen).await
}
