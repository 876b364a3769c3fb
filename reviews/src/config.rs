use crate::error::Error;
use std::env;

/// Environment variable holding the Postgres connection string.
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Function configuration, captured once at boot. A missing connection
/// string only fails requests that need the store.
#[derive(Clone, Debug, Default)]
pub struct Config {
    database_url: Option<String>,
}

impl Config {
    pub fn new(database_url: impl Into<String>) -> Self {
        Config {
            database_url: Some(database_url.into()),
        }
    }

    pub fn from_env() -> Self {
        Config {
            database_url: env::var(DATABASE_URL).ok(),
        }
    }

    pub fn database_url(&self) -> Result<&str, Error> {
        self.database_url
            .as_deref()
            .ok_or(Error::Config(DATABASE_URL))
    }
}
