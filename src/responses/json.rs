// responses/json.rs
use crate::errors::ServerError;
use crate::responses::{base_builder, ResultResp};
use astra::Body;
use serde::Serialize;

pub const SUCCESS_MESSAGE: &str = "Success";

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    data: &'a T,
    err: i32,
    message: &'a str,
}

/// `{data, err: 0, message}` with the given status.
pub fn json_response<T: Serialize>(status: u16, data: &T, message: &str) -> ResultResp {
    let body = serde_json::to_vec(&Envelope { data, err: 0, message })
        .map_err(|e| {
            log::error!("failed to encode response: {e}");
            ServerError::InternalError
        })?;

    base_builder(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

pub fn ok_json<T: Serialize>(data: &T) -> ResultResp {
    json_response(200, data, SUCCESS_MESSAGE)
}

/// Answer to a CORS preflight.
pub fn preflight_response() -> ResultResp {
    base_builder(204)
        .header("Access-Control-Allow-Methods", "GET, POST, PATCH, DELETE, OPTIONS")
        .header(
            "Access-Control-Allow-Headers",
            "Content-Type, X-Zalo-Id-By-OA, X-Zalo-Id, X-Zalo-Name",
        )
        .header("Access-Control-Max-Age", "86400")
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
