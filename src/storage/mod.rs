pub mod local;

pub use local::LocalDiskStore;

use crate::errors::ServerError;

/// Destination for uploaded objects. Keys are relative, `/`-separated paths.
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), ServerError>;

    /// Prefix that turns a key into a public URL.
    fn public_base(&self) -> String;
}

/// Rejects absolute keys and keys that climb out of the store root.
pub fn validate_key(key: &str) -> Result<(), ServerError> {
    if key.trim().is_empty() {
        return Err(ServerError::StorageError("object key must not be empty".into()));
    }
    if key.starts_with('/') || key.contains('\\') || key.split('/').any(|seg| seg == "..") {
        return Err(ServerError::StorageError(format!(
            "object key '{key}' must be relative and normalized"
        )));
    }
    Ok(())
}
