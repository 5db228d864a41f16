use actix_web::{http::header::AUTHORIZATION, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{request::QuizRequest, response::QuizResponseDto},
    services::http_helpers::{parse_request, read_json_body, success},
};

#[post("/quiz")]
pub async fn generate_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let input = read_json_body(&body);
    let request: QuizRequest = parse_request(&input);

    let topic = request.topic();
    let difficulty = request.difficulty();
    if topic.is_empty() {
        return Ok(success(QuizResponseDto {
            questions: Vec::new(),
            topic,
            difficulty,
            raw: None,
        }));
    }

    log::info!(
        "Generating {} quiz questions on '{}' for {}",
        request.count(),
        topic,
        auth.0.subject().unwrap_or("unknown")
    );
    let quiz = state
        .quiz_service
        .assemble(&topic, request.count(), &difficulty)
        .await;
    let result = serde_json::to_value(&quiz)?;

    let user = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    state
        .usage_log
        .record("quiz", user, input, result.clone())
        .await;

    Ok(success(result))
}
