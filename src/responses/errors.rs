use crate::errors::ServerError;
use crate::responses::base_builder;
use astra::{Body, Response};
use serde_json::json;

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into the JSON envelope with a matching status.
pub fn error_to_response(err: &ServerError) -> Response {
    let payload = json!({
        "data": null,
        "err": err.code(),
        "message": err.to_string(),
    });

    base_builder(err.status())
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::from(payload.to_string()))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

/// Plain-text reply, used by the upload endpoint.
pub fn text_response(status: u16, message: &str) -> Response {
    base_builder(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(message.to_string()))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
