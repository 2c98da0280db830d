use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Replay attempts before an operation is dead-lettered.
    pub max_retries: u32,
    pub dispatch_timeout_secs: u64,
    pub retry_backoff_secs: u64,
    pub retry_backoff_cap_secs: u64,
    /// Run a catch-up drain during `init` when already online.
    pub drain_on_init: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://data/curaflow-offline.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            sync: SyncConfig {
                max_retries: 5,
                dispatch_timeout_secs: 30,
                retry_backoff_secs: 5,
                retry_backoff_cap_secs: 300,
                drain_on_init: true,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CURAFLOW_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("CURAFLOW_DB_MAX_CONNECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.database.max_connections = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CURAFLOW_SYNC_MAX_RETRIES") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.max_retries = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CURAFLOW_SYNC_DISPATCH_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.dispatch_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CURAFLOW_SYNC_RETRY_BACKOFF_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.retry_backoff_secs = value;
            }
        }
        if let Ok(v) = std::env::var("CURAFLOW_SYNC_RETRY_BACKOFF_CAP_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.retry_backoff_cap_secs = value;
            }
        }
        if let Ok(v) = std::env::var("CURAFLOW_SYNC_DRAIN_ON_INIT") {
            cfg.sync.drain_on_init = parse_bool(&v, cfg.sync.drain_on_init);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.max_retries == 0 {
            return Err("Sync max_retries must be greater than 0".to_string());
        }
        if self.sync.dispatch_timeout_secs == 0 {
            return Err("Sync dispatch_timeout_secs must be greater than 0".to_string());
        }
        if self.sync.retry_backoff_cap_secs < self.sync.retry_backoff_secs {
            return Err(
                "Sync retry_backoff_cap_secs must not be below retry_backoff_secs".to_string(),
            );
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}
