use std::sync::{Arc, Mutex};

use actix_web::{
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::NormalizePath,
    test, web, App,
};
use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::SecretString;
use serde_json::{json, Value};

use toolhub_server::{
    app_state::AppState,
    config::{Config, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL},
    constants::prompts::VISION_PROMPT,
    handlers::{self, MAX_BODY_BYTES},
    middleware::{cors, EnvelopeGuard},
    services::gateway::{GatewayError, GenerationGateway},
};

const SECRET: &str = "integration_secret";

/// Gateway double that answers every call with one canned result.
struct StubGateway {
    reply: Result<String, GatewayError>,
    prompts: Mutex<Vec<String>>,
}

impl StubGateway {
    fn new(reply: Result<String, GatewayError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationGateway for StubGateway {
    async fn generate_text(&self, prompt: &str, _temperature: f32) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }

    async fn image_to_text(&self, image: &[u8]) -> Result<String, GatewayError> {
        self.prompts
            .lock()
            .unwrap()
            .push(format!("<{} image bytes>", image.len()));
        self.reply.clone()
    }
}

fn config(dev_auth_bypass: bool) -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 5000,
        frontend_url: "http://localhost:5173".to_string(),
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        jwt_secret: Some(SecretString::from(SECRET.to_string())),
        dev_auth_bypass,
        gemini_api_key: None,
        gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
    }
}

fn bearer(sub: &str) -> String {
    let token = encode(
        &Header::default(),
        &json!({ "sub": sub, "email": "student@example.com" }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(EnvelopeGuard)
                .configure(handlers::configure_app($state))
                .default_service(web::to(handlers::not_found)),
        )
        .await
    };
}

/// Same middleware order as the server binary.
macro_rules! init_server_app {
    ($state:expr) => {{
        let state: AppState = $state;
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(cors(&state.config))
                .wrap(EnvelopeGuard)
                .configure(handlers::configure_app(state))
                .default_service(web::to(handlers::not_found)),
        )
        .await
    }};
}

const BOUNDARY: &str = "api-test-boundary";

fn form_part(body: &mut Vec<u8>, name: &str, filename: Option<&str>, content: &[u8]) {
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(filename) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                name, filename
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        ),
    }
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");
}

fn form_request(uri: &str, body: Vec<u8>) -> test::TestRequest {
    let mut body = body;
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

async fn post_json(
    state: AppState,
    uri: &str,
    authorization: Option<&str>,
    payload: Value,
) -> (StatusCode, Value) {
    let app = init_app!(state);
    let mut req = test::TestRequest::post().uri(uri).set_json(payload);
    if let Some(value) = authorization {
        req = req.insert_header((AUTHORIZATION, value.to_string()));
    }
    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

#[actix_web::test]
async fn test_health_is_public() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Ok(String::new())));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"]["status"], "ok");
}

#[actix_web::test]
async fn test_preflight_needs_no_credentials() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Ok(String::new())));
    let app = init_app!(state);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn test_missing_token_is_rejected_before_the_model_is_called() {
    let gateway = StubGateway::new(Ok("hello".to_string()));
    let state = AppState::with_gateway(config(false), gateway.clone());

    let (status, body) = post_json(state, "/api/chat", None, json!({ "prompt": "hi" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({
            "ok": false,
            "result": null,
            "error": { "code": "unauthorized", "message": "Authentication required" }
        })
    );
    assert_eq!(gateway.calls(), 0);
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Ok("x".to_string())));
    let (status, body) = post_json(
        state,
        "/api/notes",
        Some("Bearer not.a.token"),
        json!({ "text": "cells" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[actix_web::test]
async fn test_valid_token_reaches_the_tool() {
    let gateway = StubGateway::new(Ok("  Hello there  ".to_string()));
    let state = AppState::with_gateway(config(false), gateway.clone());

    let (status, body) = post_json(
        state,
        "/api/chat",
        Some(&bearer("user-1")),
        json!({ "prompt": "hi" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": true, "result": { "message": "Hello there" }, "error": null })
    );
    assert_eq!(gateway.calls(), 1);
}

#[actix_web::test]
async fn test_dev_bypass_allows_anonymous_requests() {
    let state = AppState::with_gateway(config(true), StubGateway::new(Ok("summary".to_string())));
    let (status, body) =
        post_json(state, "/api/summarizer", None, json!({ "text": "long text" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["summary"], "summary");
}

#[actix_web::test]
async fn test_empty_input_yields_empty_result_without_model_call() {
    let gateway = StubGateway::new(Ok("unused".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());

    let (status, body) = post_json(state, "/api/translator", None, json!({ "text": "  " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["result"], json!({ "translated_text": "" }));
    assert_eq!(gateway.calls(), 0);
}

#[actix_web::test]
async fn test_non_json_body_is_treated_as_empty() {
    let gateway = StubGateway::new(Ok("unused".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/research")
        .insert_header(("content-type", "text/plain"))
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"], json!({ "research": "" }));
    assert_eq!(gateway.calls(), 0);
}

#[actix_web::test]
async fn test_trailing_slash_is_normalized() {
    let state = AppState::with_gateway(config(true), StubGateway::new(Ok("fn main() {}".to_string())));
    let (status, body) = post_json(
        state,
        "/api/code-generator/",
        None,
        json!({ "description": "entry point", "language": "rust" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["code"], "fn main() {}");
}

#[actix_web::test]
async fn test_rate_limit_maps_to_429() {
    let state = AppState::with_gateway(config(true), StubGateway::new(Err(GatewayError::RateLimit)));
    let (status, body) = post_json(state, "/api/blog-writer", None, json!({ "topic": "ai" })).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["ok"], false);
    assert!(body["result"].is_null());
    assert_eq!(body["error"]["code"], "rate_limit");
}

#[actix_web::test]
async fn test_other_gateway_failures_map_to_server_error() {
    let state = AppState::with_gateway(
        config(true),
        StubGateway::new(Err(GatewayError::ModelHttp {
            status: 503,
            body: "unavailable".to_string(),
        })),
    );
    let (status, body) =
        post_json(state, "/api/email-writer", None, json!({ "purpose": "follow up" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "server_error");
}

#[actix_web::test]
async fn test_math_splits_steps_and_answer() {
    let steps = "Step 1: 2 + 2\nANSWER: 4";
    let state = AppState::with_gateway(config(true), StubGateway::new(Ok(steps.to_string())));
    let (status, body) = post_json(state, "/api/math", None, json!({ "problem": "2+2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({ "steps": steps, "answer": "4" }));
}

#[actix_web::test]
async fn test_vision_accepts_raw_image_upload() {
    let gateway = StubGateway::new(Ok("a red square".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/vision")
        .insert_header(("content-type", "image/png"))
        .set_payload(vec![0x89, b'P', b'N', b'G'])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"]["text"], "a red square");
    assert_eq!(gateway.prompts.lock().unwrap()[0], "<4 image bytes>");
}

#[actix_web::test]
async fn test_quiz_falls_back_to_placeholders_on_garbage() {
    let state = AppState::with_gateway(
        config(true),
        StubGateway::new(Ok("I cannot produce JSON today".to_string())),
    );
    let (status, body) = post_json(
        state,
        "/api/quiz",
        None,
        json!({ "topic": "rust", "count": 3, "difficulty": "easy" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let result = &body["result"];
    assert_eq!(result["questions"].as_array().unwrap().len(), 3);
    assert_eq!(
        result["questions"][0],
        json!({
            "q": "Placeholder question 1 about rust?",
            "options": ["A", "B", "C", "D"],
            "answer": "A"
        })
    );
    assert_eq!(result["topic"], "rust");
    assert_eq!(result["difficulty"], "easy");
    assert_eq!(result["raw"], "I cannot produce JSON today");
}

#[actix_web::test]
async fn test_quiz_uses_model_questions_verbatim() {
    let model_text = r#"Sure! {"questions": [
        {"q": "What is ownership?", "options": ["A", "B"], "answer": "A"},
        {"question": "What is a borrow?", "options": ["x", "y", "z"], "answer": "y"}
    ]}"#;
    let state = AppState::with_gateway(config(true), StubGateway::new(Ok(model_text.to_string())));
    let (status, body) = post_json(
        state,
        "/api/quiz",
        None,
        json!({ "topic": "rust", "count": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let result = &body["result"];
    let questions = result["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["q"], "What is ownership?");
    assert_eq!(questions[1]["q"], "What is a borrow?");
    assert_eq!(questions[1]["answer"], "y");
    assert!(result["raw"].is_null());
}

#[actix_web::test]
async fn test_usage_lists_recorded_quizzes() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Err(GatewayError::EmptyResponse)));
    let app = init_app!(state);
    let token = bearer("user-7");

    let req = test::TestRequest::post()
        .uri("/api/quiz")
        .insert_header((AUTHORIZATION, token.clone()))
        .set_json(json!({ "topic": "sql", "count": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/usage")
        .insert_header((AUTHORIZATION, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let usage = body["result"]["usage"].as_array().unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0]["id"], "quiz-1");
    assert_eq!(usage[0]["tool"], "quiz");
    assert_eq!(usage[0]["user"], token.as_str());
    assert_eq!(usage[0]["input"], json!({ "topic": "sql", "count": 1 }));
}

#[actix_web::test]
async fn test_unknown_route_is_not_found_envelope() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Ok(String::new())));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[actix_web::test]
async fn test_wrongly_typed_sibling_field_does_not_cancel_generation() {
    let gateway = StubGateway::new(Ok("optimized".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());
    let (status, body) = post_json(
        state,
        "/api/seo-optimizer",
        None,
        json!({ "text": "hello world", "keywords": "rust, seo" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["seo_text"], "optimized");

    let state = AppState::with_gateway(config(true), gateway.clone());
    let (status, body) = post_json(
        state,
        "/api/chat",
        None,
        json!({ "prompt": "hi", "messages": "oops" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "optimized");
    assert_eq!(gateway.calls(), 2);
}

#[actix_web::test]
async fn test_vision_reads_multipart_file() {
    let gateway = StubGateway::new(Ok("a cat".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());
    let app = init_app!(state);

    let mut body = Vec::new();
    form_part(&mut body, "file", Some("cat.png"), &[0x89, b'P', b'N', b'G', 0x0d]);
    form_part(&mut body, "prompt", None, b"what animal is this?");
    let resp = test::call_service(&app, form_request("/api/vision", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"]["text"], "a cat");
    assert_eq!(*gateway.prompts.lock().unwrap(), vec!["<5 image bytes>".to_string()]);
}

#[actix_web::test]
async fn test_vision_multipart_without_file_uses_prompt() {
    let gateway = StubGateway::new(Ok("a sunset".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());
    let app = init_app!(state);

    let mut body = Vec::new();
    form_part(&mut body, "prompt", None, b"describe a sunset");
    let resp = test::call_service(&app, form_request("/api/vision", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"]["text"], "a sunset");
    assert_eq!(
        *gateway.prompts.lock().unwrap(),
        vec![format!("{}describe a sunset", VISION_PROMPT)]
    );
}

#[actix_web::test]
async fn test_oversized_body_gets_envelope() {
    let gateway = StubGateway::new(Ok("unused".to_string()));
    let state = AppState::with_gateway(config(true), gateway.clone());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/summarizer")
        .insert_header(("content-type", "application/json"))
        .set_payload(vec![b' '; MAX_BODY_BYTES + 1])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], false);
    assert!(body["result"].is_null());
    assert_eq!(body["error"]["code"], "payload_too_large");
    assert_eq!(gateway.calls(), 0);
}

#[actix_web::test]
async fn test_quiz_count_is_capped() {
    let state = AppState::with_gateway(config(true), StubGateway::new(Ok("garbage".to_string())));
    let (status, body) = post_json(
        state,
        "/api/quiz",
        None,
        json!({ "topic": "rust", "count": 25 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["questions"].as_array().unwrap().len(), 20);
}

#[actix_web::test]
async fn test_browser_preflight_is_no_content() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Ok(String::new())));
    let app = init_server_app!(state);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .insert_header(("origin", "http://localhost:5173"))
        .insert_header(("access-control-request-method", "POST"))
        .insert_header(("access-control-request-headers", "authorization,content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}

#[actix_web::test]
async fn test_disallowed_origin_gets_envelope() {
    let state = AppState::with_gateway(config(false), StubGateway::new(Ok(String::new())));
    let app = init_server_app!(state);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .insert_header(("origin", "http://elsewhere.example"))
        .insert_header(("access-control-request-method", "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "bad_request");
}
