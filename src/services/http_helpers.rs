use actix_web::{http::StatusCode, HttpResponse};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::models::dto::Envelope;

/// Creates a 200 success envelope
pub fn success<T: Serialize>(result: T) -> HttpResponse {
    success_with_status(result, StatusCode::OK)
}

/// Creates a success envelope with an explicit status
pub fn success_with_status<T: Serialize>(result: T, status: StatusCode) -> HttpResponse {
    match serde_json::to_value(result) {
        Ok(value) => HttpResponse::build(status).json(Envelope::success(value)),
        Err(err) => {
            log::error!("Failed to serialize response payload: {}", err);
            fail("server_error", &err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Creates a failure envelope
pub fn fail(code: &str, message: &str, status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::fail(code, message))
}

/// Answer for CORS preflight requests
pub fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Reads a request body as a JSON object. Anything else counts as `{}`.
pub fn read_json_body(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

/// Decodes a tool request from its JSON body, falling back to the all-defaults request.
pub fn parse_request<T: DeserializeOwned + Default>(body: &Value) -> T {
    T::deserialize(body).unwrap_or_else(|err| {
        log::info!("Ignoring malformed request body: {}", err);
        T::default()
    })
}
