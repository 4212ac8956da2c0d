use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_DB_PATH: &str = "screech.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read `SCREECH_DB_PATH`, `SCREECH_HOST` and `SCREECH_PORT`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("SCREECH_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let host = lookup("SCREECH_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = lookup("SCREECH_PORT")
            .unwrap_or_else(|| DEFAULT_PORT.into())
            .parse()
            .context("SCREECH_PORT must be a port number")?;

        Ok(Self {
            db_path: db_path.into(),
            host,
            port,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
