// src/handlers/upload.rs
use astra::{Request, Response};
use log::error;

use crate::app::App;
use crate::errors::ServerError;
use crate::handlers::read_body;
use crate::ids::now_millis;
use crate::responses::json::SUCCESS_MESSAGE;
use crate::responses::{json_response, text_response};
use crate::upload::multipart::{boundary_from_content_type, parse_multipart};
use crate::upload::{store_images, UploadedImages};

fn receive(req: &mut Request, app: &App) -> Result<UploadedImages, ServerError> {
    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let boundary = boundary_from_content_type(&content_type)?;

    let body = read_body(req, app.config.max_body_bytes)?;
    let parts = parse_multipart(&body, &boundary)?;
    store_images(&parts, app.store.as_ref(), now_millis())
}

/// `POST /upload`. Replies in plain text on failure.
pub fn upload_images(mut req: Request, app: &App) -> Response {
    if req.method().as_str() != "POST" {
        return text_response(405, "Method Not Allowed");
    }

    match receive(&mut req, app).and_then(|uploaded| json_response(200, &uploaded, SUCCESS_MESSAGE)) {
        Ok(resp) => resp,
        Err(e) => {
            error!("Upload failed: {e}");
            text_response(500, "Upload failed")
        }
    }
}
