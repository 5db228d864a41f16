use actix_web::{post, web, HttpMessage, HttpRequest, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

use crate::{
    app_state::AppState,
    constants::prompts,
    errors::AppError,
    models::dto::{
        request::{
            BlogWriterRequest, ChatRequest, CodeGeneratorRequest, EmailWriterRequest,
            ImageGeneratorRequest, MathRequest, PdfAction, PdfToolsRequest, ResearchRequest,
            ResumeRequest, SeoOptimizerRequest, SocialMediaWriterRequest, TextRequest,
            TextToVoiceRequest, TranslatorRequest, VisionRequest, VoiceToTextRequest,
        },
        response::MathResponseDto,
    },
    services::{
        http_helpers::{parse_request, read_json_body, success},
        upload::{read_form, FormUpload},
    },
};

fn log_failure(tool: &str) -> impl Fn(&AppError) + '_ {
    move |e| log::error!("{} error: {}", tool, e)
}

/// Runs one prompt through the model and wraps the text under `field`.
async fn generate_into(
    state: &AppState,
    tool: &str,
    field: &str,
    prompt: &str,
) -> Result<HttpResponse, AppError> {
    let text = state
        .tool_service
        .generate(prompt)
        .await
        .inspect_err(log_failure(tool))?;
    Ok(success(json!({ field: text })))
}

fn empty(field: &str) -> HttpResponse {
    success(json!({ field: "" }))
}

#[post("/chat")]
async fn chat(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: ChatRequest = parse_request(&read_json_body(&body));
    let prompt = request.prompt();
    if prompt.is_empty() {
        return Ok(empty("message"));
    }
    generate_into(&state, "chat", "message", &prompt).await
}

fn is_image_upload(req: &HttpRequest) -> bool {
    let content_type = req.content_type();
    content_type.starts_with("image/") || content_type == "application/octet-stream"
}

fn is_form_upload(req: &HttpRequest) -> bool {
    req.content_type() == "multipart/form-data"
}

async fn describe(state: &AppState, image: &[u8]) -> Result<HttpResponse, AppError> {
    let text = state
        .tool_service
        .describe_image(image)
        .await
        .inspect_err(log_failure("vision"))?;
    Ok(success(json!({ "text": text })))
}

async fn describe_prompt(state: &AppState, prompt: &str) -> Result<HttpResponse, AppError> {
    if prompt.is_empty() {
        return Ok(empty("text"));
    }
    generate_into(
        state,
        "vision",
        "text",
        &format!("{}{}", prompts::VISION_PROMPT, prompt),
    )
    .await
}

/// Accepts a raw image body, a form with a `file` part (and optional `prompt`),
/// or JSON with a base64 `image` or a text `prompt`, in that order.
#[post("/vision")]
async fn vision(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    if is_image_upload(&req) {
        if body.is_empty() {
            return Ok(empty("text"));
        }
        return describe(&state, &body).await;
    }

    if is_form_upload(&req) {
        let upload = read_form(req.headers(), body).await.unwrap_or_else(|e| {
            log::info!("Ignoring unreadable vision form: {}", e);
            FormUpload::default()
        });
        return match upload.file.as_deref() {
            Some(image) if !image.is_empty() => describe(&state, image).await,
            _ => describe_prompt(&state, upload.field("prompt")).await,
        };
    }

    let request: VisionRequest = parse_request(&read_json_body(&body));
    let encoded = request.image();
    if !encoded.is_empty() {
        match STANDARD.decode(encoded.as_bytes()) {
            Ok(image) if !image.is_empty() => return describe(&state, &image).await,
            Ok(_) => {}
            Err(e) => log::info!("Ignoring undecodable vision image: {}", e),
        }
    }

    describe_prompt(&state, &request.prompt()).await
}

#[post("/resume")]
async fn resume(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: ResumeRequest = parse_request(&read_json_body(&body));
    let role = request.role();
    if role.is_empty() {
        return Ok(empty("resume"));
    }
    let prompt = prompts::resume_prompt(&role, &request.experience(), &request.skills());
    generate_into(&state, "resume", "resume", &prompt).await
}

#[post("/math")]
async fn math(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: MathRequest = parse_request(&read_json_body(&body));
    let problem = request.problem();
    if problem.is_empty() {
        return Ok(success(MathResponseDto {
            steps: String::new(),
            answer: String::new(),
        }));
    }
    let solution = state
        .tool_service
        .solve_math(&problem)
        .await
        .inspect_err(log_failure("math"))?;
    Ok(success(solution))
}

#[post("/pdf-tools")]
async fn pdf_tools(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: PdfToolsRequest = parse_request(&read_json_body(&body));
    let text = request.text();
    if text.is_empty() {
        return Ok(empty("text"));
    }
    let instruction = match request.action() {
        PdfAction::Summarize => prompts::PDF_SUMMARIZE_PROMPT,
        PdfAction::ExtractTopics => prompts::PDF_EXTRACT_TOPICS_PROMPT,
        PdfAction::Other => prompts::PDF_GENERIC_PROMPT,
    };
    generate_into(&state, "pdf-tools", "text", &format!("{}{}", instruction, text)).await
}

#[post("/research")]
async fn research(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: ResearchRequest = parse_request(&read_json_body(&body));
    let topic = request.topic();
    if topic.is_empty() {
        return Ok(empty("research"));
    }
    let prompt = format!("{}{}", prompts::RESEARCH_PROMPT, topic);
    generate_into(&state, "research", "research", &prompt).await
}

#[post("/notes")]
async fn notes(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: TextRequest = parse_request(&read_json_body(&body));
    let text = request.text();
    if text.is_empty() {
        return Ok(empty("notes"));
    }
    let prompt = format!("{}{}", prompts::NOTES_PROMPT, text);
    generate_into(&state, "notes", "notes", &prompt).await
}

#[post("/code-generator")]
async fn code_generator(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: CodeGeneratorRequest = parse_request(&read_json_body(&body));
    let description = request.description();
    if description.is_empty() {
        return Ok(empty("code"));
    }
    let prompt = prompts::code_prompt(&request.language(), &description);
    generate_into(&state, "code-generator", "code", &prompt).await
}

#[post("/image-generator")]
async fn image_generator(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: ImageGeneratorRequest = parse_request(&read_json_body(&body));
    let prompt = request.prompt();
    if prompt.is_empty() {
        return Ok(empty("image_prompt"));
    }
    let refinement = prompts::image_prompt_refinement(&request.style(), &prompt);
    generate_into(&state, "image-generator", "image_prompt", &refinement).await
}

#[post("/summarizer")]
async fn summarizer(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: TextRequest = parse_request(&read_json_body(&body));
    let text = request.text();
    if text.is_empty() {
        return Ok(empty("summary"));
    }
    let prompt = format!("{}{}", prompts::SUMMARIZER_PROMPT, text);
    generate_into(&state, "summarizer", "summary", &prompt).await
}

#[post("/translator")]
async fn translator(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: TranslatorRequest = parse_request(&read_json_body(&body));
    let text = request.text();
    if text.is_empty() {
        return Ok(empty("translated_text"));
    }
    let prompt = prompts::translate_prompt(&request.target_lang(), &text);
    generate_into(&state, "translator", "translated_text", &prompt).await
}

#[post("/voice-to-text")]
async fn voice_to_text(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: VoiceToTextRequest = parse_request(&read_json_body(&body));
    let raw = request.transcription();
    if raw.is_empty() {
        return Ok(empty("transcript"));
    }
    let prompt = format!("{}{}", prompts::VOICE_TO_TEXT_PROMPT, raw);
    generate_into(&state, "voice-to-text", "transcript", &prompt).await
}

#[post("/text-to-voice")]
async fn text_to_voice(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: TextToVoiceRequest = parse_request(&read_json_body(&body));
    let text = request.text();
    if text.is_empty() {
        return Ok(empty("voice_script"));
    }
    let prompt = prompts::voice_script_prompt(&request.style(), &text);
    generate_into(&state, "text-to-voice", "voice_script", &prompt).await
}

#[post("/email-writer")]
async fn email_writer(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: EmailWriterRequest = parse_request(&read_json_body(&body));
    let purpose = request.purpose();
    if purpose.is_empty() {
        return Ok(empty("email"));
    }
    let prompt = prompts::email_prompt(&request.tone(), &purpose, &request.details());
    generate_into(&state, "email-writer", "email", &prompt).await
}

#[post("/social-media-writer")]
async fn social_media_writer(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: SocialMediaWriterRequest = parse_request(&read_json_body(&body));
    let topic = request.topic();
    if topic.is_empty() {
        return Ok(empty("post"));
    }
    let prompt = prompts::social_post_prompt(&request.platform(), &topic, &request.tone());
    generate_into(&state, "social-media-writer", "post", &prompt).await
}

#[post("/blog-writer")]
async fn blog_writer(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let request: BlogWriterRequest = parse_request(&read_json_body(&body));
    let topic = request.topic();
    if topic.is_empty() {
        return Ok(empty("blog"));
    }
    let prompt = prompts::blog_prompt(&request.length(), &topic);
    generate_into(&state, "blog-writer", "blog", &prompt).await
}

#[post("/seo-optimizer")]
async fn seo_optimizer(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: SeoOptimizerRequest = parse_request(&read_json_body(&body));
    let text = request.text();
    if text.is_empty() {
        return Ok(empty("seo_text"));
    }
    let prompt = prompts::seo_prompt(&request.tone(), &request.keywords(), &text);
    generate_into(&state, "seo-optimizer", "seo_text", &prompt).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat)
        .service(vision)
        .service(resume)
        .service(math)
        .service(pdf_tools)
        .service(research)
        .service(notes)
        .service(code_generator)
        .service(image_generator)
        .service(summarizer)
        .service(translator)
        .service(voice_to_text)
        .service(text_to_voice)
        .service(email_writer)
        .service(social_media_writer)
        .service(blog_writer)
        .service(seo_optimizer);
}
