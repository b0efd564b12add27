use async_trait::async_trait;
use kliniq_types::Language;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{ChatMessage, GenerationRequest, InferenceClient};
use crate::error::InferenceError;

const TRANSLATION_MAX_TOKENS: u32 = 1024;
const TRANSLATION_TEMPERATURE: f32 = 0.3;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Translation returned empty text")]
    EmptyResponse,
}

pub type TranslationResult<T> = Result<T, TranslationError>;

/// Text translation between supported languages
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `from` to `to`. Same-language calls return the input unchanged.
    async fn translate(&self, text: &str, from: Language, to: Language) -> TranslationResult<String>;
}

/// Translator backed by the chat-completion service
#[derive(Clone)]
pub struct LlmTranslator {
    client: Arc<dyn InferenceClient>,
}

impl LlmTranslator {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    fn build_request(text: &str, from: Language, to: Language) -> GenerationRequest {
        let source = from.display_name();
        let target = to.display_name();

        GenerationRequest {
            messages: vec![
                ChatMessage::system(format!(
                    "You are a professional translator specializing in Nigerian languages. \
                     Translate the following text from {source} to {target}. \
                     Provide only the translation, no explanations."
                )),
                ChatMessage::user(format!("Translate this {source} text to {target}:\n\n{text}")),
            ],
            max_tokens: TRANSLATION_MAX_TOKENS,
            temperature: TRANSLATION_TEMPERATURE,
            top_p: None,
        }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> TranslationResult<String> {
        if from == to {
            return Ok(text.to_string());
        }

        debug!(from = %from, to = %to, chars = text.chars().count(), "Translating text");

        let generation = self.client.generate(Self::build_request(text, from, to)).await?;
        let translated = generation.text.trim();

        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        Ok(translated.to_string())
    }
}

/// Outcome of a direct translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Translate, returning the original text together with the error on failure
pub async fn translate_with_fallback(
    translator: &dyn Translator,
    text: &str,
    from: Language,
    to: Language,
) -> TranslationOutcome {
    match translator.translate(text, from, to).await {
        Ok(translated) => TranslationOutcome {
            text: translated,
            error: None,
        },
        Err(e) => {
            warn!(from = %from, to = %to, error = %e, "Translation failed, returning original text");
            TranslationOutcome {
                text: text.to_string(),
                error: Some(e.to_string()),
            }
        }
    }
}
