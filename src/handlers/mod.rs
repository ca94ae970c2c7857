pub mod exports;
pub mod feedback;
pub mod me;
pub mod news;
pub mod reports;
pub mod tdp;
pub mod upload;

use astra::Request;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

use crate::errors::ServerError;
use crate::sanitize::sanitize_opt;

/// Reads the whole body, refusing anything above `limit` bytes.
pub fn read_body(req: &mut Request, limit: u64) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(limit + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;

    if buf.len() as u64 > limit {
        return Err(ServerError::BadRequest(format!(
            "request body exceeds {limit} bytes"
        )));
    }
    Ok(buf)
}

/// Parses a JSON body, runs it through the sanitizer, then into `T`.
pub fn read_json<T: DeserializeOwned>(req: &mut Request, limit: u64) -> Result<T, ServerError> {
    let raw = read_body(req, limit)?;
    let parsed: Option<Value> = if raw.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(serde_json::from_slice(&raw).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))?)
    };

    // A missing or null body reads as `{}`.
    let value = match sanitize_opt(parsed.as_ref()) {
        Value::Null => Value::Object(Default::default()),
        v => v,
    };
    serde_json::from_value(value).map_err(|e| ServerError::BadRequest(format!("invalid input: {e}")))
}

pub fn query_params(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Optional numeric query parameter; a malformed value is a bad request.
pub fn query_number<T: std::str::FromStr>(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ServerError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("query parameter '{key}' must be a number"))),
        None => Ok(None),
    }
}
