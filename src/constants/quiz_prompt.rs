/// Sampling temperature for quiz generation; low to keep the JSON shape stable.
pub const QUIZ_TEMPERATURE: f32 = 0.2;

pub const QUIZ_JSON_SCHEMA: &str =
    r#"{"questions":[{"q":"...","options":["A","B","C","D"],"answer":"A"}]}"#;

pub fn quiz_prompt(topic: &str, count: usize, difficulty: &str) -> String {
    format!(
        "You are QUIZ_JSON_BOT. Respond ONLY with strict minified JSON. \
         Generate EXACTLY {count} multiple-choice questions about '{topic}' (difficulty: {difficulty}). \
         Return ONLY this JSON schema: {QUIZ_JSON_SCHEMA} . \
         NO commentary, NO prefixes, NO markdown, NO code fences."
    )
}
