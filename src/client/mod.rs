#[cfg(feature = "network")]
pub mod gemini;

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::PartOfSpeech;
use crate::session::chat::{ChatMessage, ChatRole};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Fixed user-facing strings for every failure path. These are product copy
/// carried over from the web version; the UI renders them as-is.
pub const EXPLAIN_NO_KEY: &str =
    "API 키가 설정되지 않았습니다. 환경변수(API_KEY 또는 VITE_API_KEY)를 확인해주세요.";
pub const EXPLAIN_EMPTY: &str = "설명을 불러오는 중 오류가 발생했습니다. 다시 시도해주세요.";
pub const EXPLAIN_FAULT: &str = "AI 선생님이 잠시 쉬는 중이에요! 잠시 후 다시 시도해주세요.";
pub const CHAT_NO_KEY: &str = "API 키 설정을 확인해주세요 (VITE_API_KEY).";
pub const CHAT_EMPTY: &str = "죄송해요, 이해하지 못했어요.";
pub const CHAT_FAULT: &str = "오류가 발생했습니다.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

/// One prior conversation turn in the provider's vocabulary.
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

/// A single completion request. `response_schema` switches the provider into
/// JSON mode; `turns` carries the chat history, ending with the new message.
pub struct GenerateRequest {
    pub turns: Vec<Turn>,
    pub system_instruction: String,
    pub temperature: Option<f32>,
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// Single-prompt request with no prior history.
    pub fn prompt(text: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn {
                role: TurnRole::User,
                text: text.into(),
            }],
            system_instruction: system_instruction.into(),
            temperature: None,
            response_schema: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    /// The provider answered successfully but with no usable text.
    #[error("empty response")]
    Empty,
}

/// Boundary to the generative-language service. Implementations perform one
/// blocking request/response exchange; all prompt construction and fallback
/// policy live in [`GenerationClient`].
pub trait Provider: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}

/// One quiz question as trusted by the grading logic: always exactly 4
/// options and an in-range answer index.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

/// Raw shape as the provider returns it, before validation. The answer index
/// is signed because the model occasionally emits out-of-range values.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default = "invalid_answer")]
    correct_answer: i64,
    #[serde(default)]
    explanation: String,
}

fn invalid_answer() -> i64 {
    -1
}

const EXPLAIN_SYSTEM: &str =
    "You are a friendly middle school English teacher named 'Galaxy Teacher'.";

const CHAT_SYSTEM: &str = "You are a helpful AI tutor specializing in English grammar for \
     Korean students. Keep answers concise, encouraging, and use Korean for explanations \
     unless asked otherwise.";

/// Issues the three tutoring operations against a [`Provider`] and normalizes
/// every failure into a fixed fallback value. Nothing here retries, and no
/// error escapes to a caller.
///
/// Constructed explicitly and passed around (tests substitute a fake
/// provider); with no provider every operation short-circuits without
/// touching the network.
pub struct GenerationClient {
    provider: Option<Arc<dyn Provider>>,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A client with no credential: every operation returns its
    /// "not configured" value synchronously.
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    /// Resolve the API key (`API_KEY`, then `VITE_API_KEY`) and build a
    /// Gemini-backed client. Missing key is an expected condition, not an
    /// error.
    #[cfg(feature = "network")]
    pub fn from_env(model: &str) -> Self {
        match resolve_api_key() {
            Some(key) => Self::new(Arc::new(gemini::GeminiProvider::new(key, model.to_string()))),
            None => Self::unconfigured(),
        }
    }

    #[cfg(not(feature = "network"))]
    pub fn from_env(_model: &str) -> Self {
        Self::unconfigured()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Free-text explanation of one part of speech. Always returns renderable
    /// text; failures become one of the fixed Korean fallback strings.
    pub fn explain(&self, category: PartOfSpeech) -> String {
        let Some(provider) = &self.provider else {
            return EXPLAIN_NO_KEY.to_string();
        };

        let entry = category.entry();
        let prompt = format!(
            "You are an energetic and kind English teacher for Korean middle school students (Grade 1).\n\
             Explain the part of speech: \"{id}\" ({korean}).\n\
             \n\
             Structure:\n\
             1. **Definition**: Simple definition in Korean.\n\
             2. **Role**: What does it do in a sentence? (Korean)\n\
             3. **Examples**: Provide 3 distinct English sentences using this part of speech. \
             Highlight the word in **bold**. Provide Korean translation for each sentence.\n\
             4. **Fun Fact**: A short, interesting tip or memory aid about this part of speech in Korean.\n\
             \n\
             Use emojis to make it fun. Keep the tone encouraging and easy to understand.\n\
             Output in Markdown.",
            id = category,
            korean = entry.korean_name,
        );

        let mut request = GenerateRequest::prompt(prompt, EXPLAIN_SYSTEM);
        request.temperature = Some(0.7);

        match provider.generate(&request) {
            Ok(text) => text,
            Err(ProviderError::Empty) => EXPLAIN_EMPTY.to_string(),
            Err(err) => {
                log::error!("explanation generation failed for {category}: {err}");
                EXPLAIN_FAULT.to_string()
            }
        }
    }

    /// Structured quiz generation. An empty list means "quiz unavailable",
    /// never "zero questions by design".
    pub fn quiz(&self, category: PartOfSpeech) -> Vec<QuizQuestion> {
        let Some(provider) = &self.provider else {
            return Vec::new();
        };

        let prompt = format!(
            "Generate 3 multiple-choice questions to test a Korean middle school \
             student's understanding of \"{category}\"."
        );
        let system = format!(
            "Create suitable questions for Grade 1 Middle School students in Korea. \
             Focus on identifying the '{category}' in a sentence or choosing the correct \
             '{category}' to fill in the blank."
        );

        let mut request = GenerateRequest::prompt(prompt, system);
        // Lower temperature for factual quizzes.
        request.temperature = Some(0.5);
        request.response_schema = Some(quiz_schema());

        match provider.generate(&request) {
            Ok(text) => parse_quiz_response(&text),
            Err(err) => {
                if !matches!(err, ProviderError::Empty) {
                    log::error!("quiz generation failed for {category}: {err}");
                }
                Vec::new()
            }
        }
    }

    /// Multi-turn chat: the entire prior transcript seeds a fresh session,
    /// then the new message is sent. Both success and fallback produce
    /// exactly one assistant reply for the caller to append.
    pub fn chat(&self, message: &str, history: &[ChatMessage]) -> String {
        let Some(provider) = &self.provider else {
            return CHAT_NO_KEY.to_string();
        };

        let mut turns: Vec<Turn> = history
            .iter()
            .map(|msg| Turn {
                role: match msg.role {
                    ChatRole::User => TurnRole::User,
                    ChatRole::Assistant => TurnRole::Model,
                },
                text: msg.text.clone(),
            })
            .collect();
        turns.push(Turn {
            role: TurnRole::User,
            text: message.to_string(),
        });

        let request = GenerateRequest {
            turns,
            system_instruction: CHAT_SYSTEM.to_string(),
            temperature: None,
            response_schema: None,
        };

        match provider.generate(&request) {
            Ok(text) => text,
            Err(ProviderError::Empty) => CHAT_EMPTY.to_string(),
            Err(err) => {
                log::error!("chat completion failed: {err}");
                CHAT_FAULT.to_string()
            }
        }
    }
}

/// Schema supplied to the provider for JSON-constrained quiz output.
fn quiz_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": {
                    "type": "STRING",
                    "description": "The question text in Korean or simple English"
                },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "4 options for the answer"
                },
                "correctAnswer": {
                    "type": "INTEGER",
                    "description": "Index of the correct option (0-3)"
                },
                "explanation": {
                    "type": "STRING",
                    "description": "Why this is the correct answer (in Korean)"
                }
            },
            "required": ["question", "options", "correctAnswer", "explanation"],
            "propertyOrdering": ["question", "options", "correctAnswer", "explanation"]
        }
    })
}

#[cfg(feature = "network")]
fn resolve_api_key() -> Option<String> {
    for var in ["API_KEY", "VITE_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
    }
    None
}

/// Parse the provider's quiz payload into trusted questions. The model
/// sometimes wraps JSON in markdown code fences despite the schema, so those
/// are stripped first. Questions that fail validation (wrong option count,
/// answer index out of range) are dropped individually; a payload that fails
/// to parse at all yields the empty list.
pub fn parse_quiz_response(text: &str) -> Vec<QuizQuestion> {
    let cleaned = strip_code_fences(text);

    let raw: Vec<RawQuizQuestion> = match serde_json::from_str(&cleaned) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("quiz response did not parse as JSON: {err}");
            return Vec::new();
        }
    };

    raw.into_iter()
        .filter_map(|q| {
            if q.options.len() != 4 {
                log::warn!("dropping quiz question with {} options", q.options.len());
                return None;
            }
            let correct = usize::try_from(q.correct_answer).ok().filter(|&i| i < 4)?;
            Some(QuizQuestion {
                question: q.question,
                options: q.options,
                correct_answer: correct,
                explanation: q.explanation,
            })
        })
        .collect()
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
