use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

pub use crate::errors::ResultResp;

/// Convert a ServerError into a JSON `{ "error": ... }` response.
/// Internal details never leave the process.
pub fn error_to_response(err: &ServerError) -> Response {
    let status = err.status();
    let body = json!({ "error": err.public_message() }).to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
