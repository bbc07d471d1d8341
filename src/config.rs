use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "golang_db";
const DEFAULT_COLLECTION: &str = "todos";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            other => Err(anyhow!("unknown todo store `{}`, expected `mongo` or `memory`", other)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Mongo => write!(f, "mongo"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl MongoConfig {
    #[cfg(test)]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub mongodb: Option<MongoConfig>,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got `{}`", port))?,
            None => DEFAULT_PORT,
        };

        let uri = var("MONGODB_URI");
        let store = match var("TODO_STORE") {
            Some(kind) => kind.parse()?,
            None if uri.is_some() => StoreKind::Mongo,
            None => StoreKind::Memory,
        };

        let mongodb = match (store, uri) {
            (StoreKind::Mongo, Some(uri)) => Some(MongoConfig {
                uri,
                database: var("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                collection: var("MONGODB_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            }),
            (StoreKind::Mongo, None) => bail!("MONGODB_URI must be set when TODO_STORE=mongo"),
            (StoreKind::Memory, _) => None,
        };

        Ok(Self {
            host,
            port,
            store,
            mongodb,
        })
    }

    #[cfg(test)]
    pub fn new_mongodb_uri(mongodb_uri: String) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store: StoreKind::Mongo,
            mongodb: Some(MongoConfig::new(mongodb_uri)),
        }
    }
}
