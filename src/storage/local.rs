// src/storage/local.rs
use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::errors::ServerError;
use crate::storage::{validate_key, ObjectStore};

/// Stores objects as plain files below `root`.
#[derive(Debug, Clone)]
pub struct LocalDiskStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let mut public_base_url = public_base_url.into();
        if !public_base_url.is_empty() && !public_base_url.ends_with('/') {
            public_base_url.push('/');
        }
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for LocalDiskStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServerError> {
        validate_key(key)?;
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ServerError::StorageError(format!("create {} failed: {e}", parent.display())))?;
        }
        fs::write(&path, bytes)
            .map_err(|e| ServerError::StorageError(format!("write {} failed: {e}", path.display())))?;

        debug!("stored {key} ({} bytes, {content_type})", bytes.len());
        Ok(())
    }

    fn public_base(&self) -> String {
        self.public_base_url.clone()
    }
}
