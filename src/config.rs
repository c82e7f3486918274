use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{AppError, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60; // Toutes les heures
const DEFAULT_STORAGE_DIR: &str = ".caisse";

/// Configuration lue depuis l'environnement (.env chargé par dotenv)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub sweep_interval: Duration,
    pub session_storage_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set in .env file".to_string()))?;

        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("Invalid SERVER_PORT: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let sweep_secs = match lookup("SWEEP_INTERVAL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(AppError::Config(format!(
                        "Invalid SWEEP_INTERVAL_SECS: {}",
                        raw
                    )));
                }
            },
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };

        let session_storage_dir = lookup("SESSION_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        Ok(Self {
            database_url,
            host,
            port,
            sweep_interval: Duration::from_secs(sweep_secs),
            session_storage_dir,
        })
    }
}
