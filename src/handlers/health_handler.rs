use actix_web::{get, HttpResponse};
use serde_json::json;

use crate::services::http_helpers::success;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    success(json!({ "status": "ok" }))
}
