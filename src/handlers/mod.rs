pub mod health_handler;
pub mod quiz_handler;
pub mod tool_handler;
pub mod usage_handler;

use actix_web::{guard, http::StatusCode, web, HttpResponse};

use crate::{
    app_state::AppState,
    services::http_helpers::{fail, preflight},
};

pub use health_handler::health_check;

/// Upper bound for request bodies; image uploads go through the vision route.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

async fn preflight_handler() -> HttpResponse {
    preflight()
}

pub async fn not_found() -> HttpResponse {
    fail("not_found", "Resource not found", StatusCode::NOT_FOUND)
}

/// Routes served under `/api`. The caller is responsible for wrapping them
/// with the access gate.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(tool_handler::configure)
        .service(quiz_handler::generate_quiz)
        .service(usage_handler::list_usage)
        .service(
            web::resource("/{tail:.*}")
                .guard(guard::Options())
                .to(preflight_handler),
        );
}

/// Registers shared state, the public health route and the gated `/api` scope.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let gate = state.access_gate();
        cfg.app_data(web::Data::new(state))
            .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
            .service(health_check)
            .service(web::scope("/api").wrap(gate).configure(configure_api));
    }
}
