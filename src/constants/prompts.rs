pub const NOTES_PROMPT: &str =
    "Create structured bullet-point study notes with headings and indentation:\n\n";

pub const SUMMARIZER_PROMPT: &str = "Summarize clearly and concisely:\n\n";

pub const RESEARCH_PROMPT: &str =
    "Provide structured research summary, key points, pros/cons, and examples about:\n\n";

pub const VOICE_TO_TEXT_PROMPT: &str = "Clean and punctuate this raw transcription:\n\n";

pub const VISION_PROMPT: &str = "Describe in detail: ";

pub const MATH_PROMPT: &str =
    "Solve this math problem step-by-step. Finish with line 'ANSWER: <final>'.\n\n";

pub const PDF_SUMMARIZE_PROMPT: &str = "Summarize this PDF text:\n\n";
pub const PDF_EXTRACT_TOPICS_PROMPT: &str =
    "Extract key topics and headings from this PDF text:\n\n";
pub const PDF_GENERIC_PROMPT: &str = "Process this PDF text helpfully:\n\n";

pub fn resume_prompt(role: &str, experience: &str, skills: &[String]) -> String {
    format!(
        "Create a professional resume. Role: {}. Experience: {}. Skills: {}",
        role,
        experience,
        skills.join(", ")
    )
}

pub fn code_prompt(language: &str, description: &str) -> String {
    format!(
        "Write {} code only (include helpful comments) for: {}",
        language, description
    )
}

pub fn image_prompt_refinement(style: &str, prompt: &str) -> String {
    format!(
        "Refine into a detailed generative image prompt (style: {}): {}",
        style, prompt
    )
}

pub fn translate_prompt(target_lang: &str, text: &str) -> String {
    format!("Translate into {}:\n\n{}", target_lang, text)
}

pub fn voice_script_prompt(style: &str, text: &str) -> String {
    format!(
        "Rewrite as natural spoken script (voice style: {}):\n\n{}",
        style, text
    )
}

pub fn email_prompt(tone: &str, purpose: &str, details: &str) -> String {
    format!(
        "Write a {} email. Purpose: {}. Details: {}",
        tone, purpose, details
    )
}

pub fn social_post_prompt(platform: &str, topic: &str, tone: &str) -> String {
    format!(
        "Write a concise social media post. Platform: {}. Topic: {}. Tone: {}. Max 50 words.",
        platform, topic, tone
    )
}

pub fn blog_prompt(length: &str, topic: &str) -> String {
    format!(
        "Write a {} length blog post on: {}. Include intro, clear headed sections, conclusion.",
        length, topic
    )
}

pub fn seo_prompt(tone: &str, keywords: &[String], text: &str) -> String {
    format!(
        "Rewrite for SEO (tone: {}) using keywords: {}\n\n{}",
        tone,
        keywords.join(", "),
        text
    )
}
