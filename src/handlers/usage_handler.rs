use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::response::UsageResponseDto,
    services::http_helpers::success,
};

#[get("/usage")]
pub async fn list_usage(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::debug!(
        "Usage log requested by {}",
        auth.0.subject().unwrap_or("unknown")
    );
    let usage = state.usage_log.entries().await;
    Ok(success(UsageResponseDto { usage }))
}
