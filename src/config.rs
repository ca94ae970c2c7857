// src/config.rs
use crate::auth::roles::RoleConfig;
use crate::errors::ServerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "WARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackRateLimit {
    pub max_per_window: u32,
    pub window_secs: i64,
}

impl Default for FeedbackRateLimit {
    fn default() -> Self {
        Self {
            max_per_window: 5,
            window_secs: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: String,
    pub schema_path: String,
    pub bind_addr: String,
    pub max_workers: usize,
    /// Default filter for env_logger; `RUST_LOG` still wins.
    pub log_level: String,
    /// Root directory of the local object store used by `/upload`.
    pub storage_dir: String,
    /// Returned as `domain` in upload responses. Must end with '/'.
    pub public_base_url: String,
    /// Offset applied when formatting timestamps in exports.
    pub utc_offset_hours: i32,
    pub max_body_bytes: u64,
    pub roles: RoleConfig,
    pub feedback_rate_limit: FeedbackRateLimit,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "ward_connect.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            log_level: "info".to_string(),
            storage_dir: "storage".to_string(),
            public_base_url: "http://127.0.0.1:3000/storage/".to_string(),
            utc_offset_hours: 7,
            max_body_bytes: 20 * 1024 * 1024,
            roles: RoleConfig::default(),
            feedback_rate_limit: FeedbackRateLimit::default(),
        }
    }
}

impl AppConfig {
    /// Load from `WARD_CONFIG` (or `config.json` when present), then apply env overrides.
    pub fn load() -> Result<Self, ServerError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut cfg = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else if explicit.is_some() {
            return Err(ServerError::ConfigError(format!("config file not found: {path}")));
        } else {
            Self::default()
        };

        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.normalize();
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> Result<Self, ServerError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ServerError::ConfigError(format!("failed to read config {path}: {e}")))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ServerError> {
        serde_json::from_str(raw)
            .map_err(|e| ServerError::ConfigError(format!("invalid config: {e}")))
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("WARD_DB_PATH") {
            self.db_path = v;
        }
        if let Some(v) = lookup("WARD_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("WARD_STORAGE_DIR") {
            self.storage_dir = v;
        }
        if let Some(v) = lookup("WARD_PUBLIC_BASE_URL") {
            self.public_base_url = v;
        }
    }

    fn normalize(&mut self) {
        if !self.public_base_url.ends_with('/') {
            self.public_base_url.push('/');
        }
        if self.max_workers == 0 {
            self.max_workers = 1;
        }
    }
}
