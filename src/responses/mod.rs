pub mod errors;
pub mod json;
pub mod xlsx;

use astra::ResponseBuilder;

pub use errors::{error_to_response, text_response, ResultResp};
pub use json::{json_response, ok_json, preflight_response};
pub use xlsx::xlsx_response;

pub const ALLOW_ORIGIN: &str = "*";

/// Response builder carrying the headers every reply shares.
pub fn base_builder(status: u16) -> ResponseBuilder {
    ResponseBuilder::new()
        .status(status)
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
}
