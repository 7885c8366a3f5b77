use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ORS_API_BASE: &str = "api.openrouteservice.org";
const DEFAULT_ORS_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub listen: SocketAddr,
    pub database: Option<DatabaseConfig>,
    pub routing: RoutingConfig,
    pub default_origin: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct RoutingConfig {
    pub api_base: String,
    /// Without a key every geocoding call fails as not configured.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_ORS_API_BASE.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_ORS_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads the process environment, after merging in a `.env` file when one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let listen = parse_or(
            var("GRANJA_LISTEN"),
            "GRANJA_LISTEN",
            SocketAddr::from(([127, 0, 0, 1], 3000)),
        )?;

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(
                    var("DATABASE_MAX_CONNECTIONS"),
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
            None => None,
        };

        let timeout_secs = parse_or(
            var("ORS_TIMEOUT_SECS"),
            "ORS_TIMEOUT_SECS",
            DEFAULT_ORS_TIMEOUT_SECS,
        )?;

        let routing = RoutingConfig {
            api_base: var("ORS_API_BASE").unwrap_or_else(|| DEFAULT_ORS_API_BASE.into()),
            api_key: var("ORS_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            listen,
            database,
            routing,
            default_origin: var("GRANJA_DEFAULT_ORIGIN"),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, Error> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::config_error(format!("invalid value for {}: {:?}", key, value))),
        None => Ok(default),
    }
}
