use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
const CORS_ORIGIN_ENV: &str = "CORS_ORIGIN";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATABASE_PATH: &str = "data/todos.db";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Environment-level configuration for the service. Every field has a
/// default, so a bare process starts against `data/todos.db` on
/// 127.0.0.1:3001.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = match std::env::var(HOST_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid {HOST_ENV} value '{raw}', using default");
                defaults.host
            }),
            Err(_) => defaults.host,
        };

        let port = match std::env::var(PORT_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid {PORT_ENV} value '{raw}', using default");
                defaults.port
            }),
            Err(_) => defaults.port,
        };

        let database_path = std::env::var(DATABASE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let cors_origin = std::env::var(CORS_ORIGIN_ENV).unwrap_or(defaults.cors_origin);

        Self {
            host,
            port,
            database_path,
            cors_origin,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
