// src/app.rs
use chrono::{FixedOffset, Offset, Utc};
use std::sync::Arc;

use crate::auth::RoleResolver;
use crate::config::AppConfig;
use crate::db::Database;
use crate::spreadsheets::ExportContext;
use crate::storage::{LocalDiskStore, ObjectStore};

/// Everything a request handler needs, shared by all workers.
#[derive(Clone)]
pub struct App {
    pub db: Database,
    pub config: AppConfig,
    pub roles: RoleResolver,
    pub store: Arc<dyn ObjectStore>,
}

impl App {
    pub fn new(config: AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db: Database::new(config.db_path.clone()),
            roles: RoleResolver::new(config.roles.clone()),
            config,
            store,
        }
    }

    /// App backed by a local-disk object store under `storage_dir`.
    pub fn from_config(config: AppConfig) -> Self {
        let store = LocalDiskStore::new(&config.storage_dir, config.public_base_url.clone());
        Self::new(config, Arc::new(store))
    }

    /// Display offset for timestamps; falls back to UTC for out-of-range hours.
    pub fn display_offset(&self) -> FixedOffset {
        self.config
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn export_context(&self, now: i64) -> ExportContext {
        ExportContext::new(now, self.display_offset())
    }
}
