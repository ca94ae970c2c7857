// src/upload/multipart.rs
//! Minimal `multipart/form-data` reader for buffered request bodies.
use mime::Mime;

use crate::errors::ServerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Boundary parameter of a `multipart/form-data` content type.
pub fn boundary_from_content_type(content_type: &str) -> Result<String, ServerError> {
    let parsed: Mime = content_type
        .parse()
        .map_err(|e| ServerError::BadRequest(format!("invalid content type: {e}")))?;

    if parsed.type_() != mime::MULTIPART || parsed.subtype() != mime::FORM_DATA {
        return Err(ServerError::BadRequest(format!(
            "expected multipart/form-data, got {}",
            parsed.essence_str()
        )));
    }

    parsed
        .get_param(mime::BOUNDARY)
        .map(|b| b.as_str().to_string())
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ServerError::BadRequest("multipart boundary missing".into()))
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn malformed(what: &str) -> ServerError {
    ServerError::BadRequest(format!("malformed multipart body: {what}"))
}

/// Value of `key="..."` (or unquoted `key=...`) inside a header value.
fn header_param(value: &str, key: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|segment| {
        let (k, v) = segment.trim().split_once('=')?;
        if !k.trim().eq_ignore_ascii_case(key) {
            return None;
        }
        let v = v.trim();
        let v = v
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(v);
        Some(v.to_string())
    })
}

fn parse_part(raw: &[u8]) -> Result<Part, ServerError> {
    let header_end = find(raw, b"\r\n\r\n", 0).ok_or_else(|| malformed("part headers not terminated"))?;
    let headers = std::str::from_utf8(&raw[..header_end]).map_err(|_| malformed("part headers are not utf-8"))?;

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    for line in headers.split("\r\n") {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.eq_ignore_ascii_case("content-disposition") {
            name = header_param(value, "name");
            filename = header_param(value, "filename");
        } else if key.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.trim().to_string());
        }
    }

    Ok(Part {
        name: name.ok_or_else(|| malformed("part without a name"))?,
        filename,
        content_type,
        data: raw[header_end + 4..].to_vec(),
    })
}

/// Splits a buffered body into its parts, in order.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<Vec<Part>, ServerError> {
    let delimiter = format!("--{boundary}").into_bytes();
    let next_delimiter = format!("\r\n--{boundary}").into_bytes();

    let mut pos = find(body, &delimiter, 0).ok_or_else(|| malformed("opening boundary not found"))? + delimiter.len();
    let mut parts = Vec::new();

    loop {
        if body[pos..].starts_with(b"--") {
            return Ok(parts);
        }
        if !body[pos..].starts_with(b"\r\n") {
            return Err(malformed("boundary not followed by a line break"));
        }
        let start = pos + 2;
        let end = find(body, &next_delimiter, start).ok_or_else(|| malformed("closing boundary not found"))?;

        parts.push(parse_part(&body[start..end])?);
        pos = end + next_delimiter.len();
    }
}

/// File name without any client-side directory components.
pub fn basename(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}
