use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_QUESTION_COUNT: usize = 5;
/// Upper bound on questions per quiz. Larger requests are served with this many
/// questions; the cap bounds the prompt size and the placeholder list.
pub const MAX_QUESTION_COUNT: usize = 20;

/// First field that holds a non-empty string, trimmed. Empty string otherwise.
///
/// Fields are kept as raw JSON so a wrongly typed field only blanks itself,
/// never the rest of the request.
fn pick(candidates: &[&Option<Value>]) -> String {
    candidates
        .iter()
        .copied()
        .filter_map(|c| c.as_ref().and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}

fn pick_or(candidates: &[&Option<Value>], default: &str) -> String {
    let has_value = candidates
        .iter()
        .copied()
        .any(|c| c.as_ref().and_then(Value::as_str).is_some_and(|s| !s.is_empty()));
    if has_value {
        pick(candidates)
    } else {
        default.to_string()
    }
}

/// String entries of a JSON array field; anything that is not an array yields nothing.
fn string_items(items: &Option<Value>) -> Vec<String> {
    items
        .as_ref()
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub prompt: Option<Value>,
    pub message: Option<Value>,
    pub messages: Option<Value>,
}

impl ChatRequest {
    /// Explicit prompt/message wins; otherwise the non-blank `content` of every
    /// message joined by newlines.
    pub fn prompt(&self) -> String {
        let direct = pick(&[&self.prompt, &self.message]);
        if !direct.is_empty() {
            return direct;
        }

        self.messages
            .as_ref()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|m| m.get("content"))
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisionRequest {
    pub prompt: Option<Value>,
    /// Base64 encoded image, as an alternative to posting raw image bytes.
    pub image: Option<Value>,
}

impl VisionRequest {
    pub fn prompt(&self) -> String {
        pick(&[&self.prompt])
    }

    pub fn image(&self) -> String {
        pick(&[&self.image])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResumeRequest {
    pub role: Option<Value>,
    pub experience: Option<Value>,
    pub skills: Option<Value>,
}

impl ResumeRequest {
    pub fn role(&self) -> String {
        pick(&[&self.role])
    }

    pub fn experience(&self) -> String {
        pick(&[&self.experience])
    }

    pub fn skills(&self) -> Vec<String> {
        string_items(&self.skills)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizRequest {
    pub topic: Option<Value>,
    #[serde(deserialize_with = "lenient_count")]
    pub count: usize,
    pub difficulty: Option<Value>,
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self {
            topic: None,
            count: DEFAULT_QUESTION_COUNT,
            difficulty: None,
        }
    }
}

impl QuizRequest {
    pub fn topic(&self) -> String {
        pick(&[&self.topic])
    }

    pub fn difficulty(&self) -> String {
        pick_or(&[&self.difficulty], "medium")
    }

    /// Requested count kept within `1..=MAX_QUESTION_COUNT` so a quiz is never empty.
    pub fn count(&self) -> usize {
        self.count.clamp(1, MAX_QUESTION_COUNT)
    }
}

/// Accepts `5`, `5.0` or `"5"`; anything else falls back to the default count.
fn lenient_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(count
        .map(|c| c.max(0) as usize)
        .unwrap_or(DEFAULT_QUESTION_COUNT))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MathRequest {
    pub problem: Option<Value>,
    pub prompt: Option<Value>,
}

impl MathRequest {
    pub fn problem(&self) -> String {
        pick(&[&self.problem, &self.prompt])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfAction {
    Summarize,
    ExtractTopics,
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PdfToolsRequest {
    pub text: Option<Value>,
    pub content: Option<Value>,
    pub prompt: Option<Value>,
    pub action: Option<Value>,
}

impl PdfToolsRequest {
    pub fn text(&self) -> String {
        pick(&[&self.text, &self.content, &self.prompt])
    }

    pub fn action(&self) -> PdfAction {
        match pick_or(&[&self.action], "summarize").as_str() {
            "summarize" => PdfAction::Summarize,
            "extract_topics" => PdfAction::ExtractTopics,
            _ => PdfAction::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResearchRequest {
    pub topic: Option<Value>,
    pub prompt: Option<Value>,
}

impl ResearchRequest {
    pub fn topic(&self) -> String {
        pick(&[&self.topic, &self.prompt])
    }
}

/// Body shared by the tools that take a block of text (`notes`, `summarizer`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextRequest {
    pub text: Option<Value>,
    pub content: Option<Value>,
    pub prompt: Option<Value>,
}

impl TextRequest {
    pub fn text(&self) -> String {
        pick(&[&self.text, &self.content, &self.prompt])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodeGeneratorRequest {
    pub description: Option<Value>,
    pub prompt: Option<Value>,
    pub language: Option<Value>,
}

impl CodeGeneratorRequest {
    pub fn description(&self) -> String {
        pick(&[&self.description, &self.prompt])
    }

    pub fn language(&self) -> String {
        pick_or(&[&self.language], "python")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageGeneratorRequest {
    pub prompt: Option<Value>,
    pub description: Option<Value>,
    pub style: Option<Value>,
}

impl ImageGeneratorRequest {
    pub fn prompt(&self) -> String {
        pick(&[&self.prompt, &self.description])
    }

    pub fn style(&self) -> String {
        pick_or(&[&self.style], "digital-art")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranslatorRequest {
    pub text: Option<Value>,
    pub prompt: Option<Value>,
    pub target_lang: Option<Value>,
    #[serde(rename = "targetLanguage")]
    pub target_language: Option<Value>,
}

impl TranslatorRequest {
    pub fn text(&self) -> String {
        pick(&[&self.text, &self.prompt])
    }

    pub fn target_lang(&self) -> String {
        pick_or(&[&self.target_lang, &self.target_language], "English")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VoiceToTextRequest {
    pub prompt: Option<Value>,
    pub text: Option<Value>,
}

impl VoiceToTextRequest {
    pub fn transcription(&self) -> String {
        pick(&[&self.prompt, &self.text])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextToVoiceRequest {
    pub text: Option<Value>,
    pub prompt: Option<Value>,
    pub style: Option<Value>,
    pub voice_style: Option<Value>,
}

impl TextToVoiceRequest {
    pub fn text(&self) -> String {
        pick(&[&self.text, &self.prompt])
    }

    pub fn style(&self) -> String {
        pick_or(&[&self.style, &self.voice_style], "narration")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailWriterRequest {
    pub purpose: Option<Value>,
    pub prompt: Option<Value>,
    pub tone: Option<Value>,
    pub details: Option<Value>,
}

impl EmailWriterRequest {
    pub fn purpose(&self) -> String {
        pick(&[&self.purpose, &self.prompt])
    }

    pub fn tone(&self) -> String {
        pick_or(&[&self.tone], "professional")
    }

    pub fn details(&self) -> String {
        pick(&[&self.details])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialMediaWriterRequest {
    pub platform: Option<Value>,
    pub topic: Option<Value>,
    pub prompt: Option<Value>,
    pub tone: Option<Value>,
}

impl SocialMediaWriterRequest {
    pub fn platform(&self) -> String {
        pick(&[&self.platform])
    }

    pub fn topic(&self) -> String {
        pick(&[&self.topic, &self.prompt])
    }

    pub fn tone(&self) -> String {
        pick_or(&[&self.tone], "Neutral")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogWriterRequest {
    pub topic: Option<Value>,
    pub prompt: Option<Value>,
    pub length: Option<Value>,
}

impl BlogWriterRequest {
    pub fn topic(&self) -> String {
        pick(&[&self.topic, &self.prompt])
    }

    pub fn length(&self) -> String {
        pick_or(&[&self.length], "medium")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeoOptimizerRequest {
    pub text: Option<Value>,
    pub content: Option<Value>,
    pub prompt: Option<Value>,
    pub keywords: Option<Value>,
    pub tone: Option<Value>,
}

impl SeoOptimizerRequest {
    pub fn text(&self) -> String {
        pick(&[&self.text, &self.content, &self.prompt])
    }

    pub fn keywords(&self) -> Vec<String> {
        string_items(&self.keywords)
    }

    pub fn tone(&self) -> String {
        pick_or(&[&self.tone], "neutral")
    }
}
