pub mod multipart;

use log::info;
use serde::Serialize;

use crate::errors::ServerError;
use crate::storage::ObjectStore;
use multipart::{basename, Part};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImages {
    pub domain: String,
    pub images: Vec<String>,
}

/// Object key for an uploaded file: `images/<epochMillis>-<basename>`.
pub fn image_key(filename: &str, now: i64) -> String {
    format!("images/{now}-{}", basename(filename))
}

/// Writes every file part to `store`. Plain form fields are ignored.
pub fn store_images(parts: &[Part], store: &dyn ObjectStore, now: i64) -> Result<UploadedImages, ServerError> {
    let mut images: Vec<String> = Vec::new();

    for part in parts {
        let Some(filename) = part.filename.as_deref().filter(|f| !basename(f).is_empty()) else {
            continue;
        };
        // same basename twice in one request: later parts move to the next free millisecond
        let mut stamp = now;
        let mut key = image_key(filename, stamp);
        while images.contains(&key) {
            stamp += 1;
            key = image_key(filename, stamp);
        }
        let content_type = part.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
        store.put(&key, &part.data, content_type)?;
        images.push(key);
    }

    info!("uploaded {} image(s)", images.len());
    Ok(UploadedImages {
        domain: store.public_base(),
        images,
    })
}
