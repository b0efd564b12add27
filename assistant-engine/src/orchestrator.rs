use chrono::Utc;
use inference_service::{GenerationRequest, InferenceClient, Usage};
use logger_redacted::PiiRedactor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actions::{annotate_reply, extract_action_calls, ActionCall, ActionDispatcher, ActionResult};
use crate::config::AssistantConfig;
use crate::context::{assemble_messages, ChatTopic, TurnContext};
use crate::error::{AssistantError, AssistantResult};
use crate::models::{ChatSession, ChatTurn};
use crate::store::ChatStore;

/// Reply sent when the model cannot be reached
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble processing your request right now. \
Please try again or contact support if the issue persists.";

const LOG_PREVIEW_CHARS: usize = 80;

/// One patient message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnRequest {
    pub patient_id: Uuid,
    /// Continue this session; a new one is created when absent
    pub session_id: Option<Uuid>,
    pub message: String,
    #[serde(default)]
    pub topic: ChatTopic,
    /// Doctor notes, upcoming visits and similar free text
    pub domain_context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub action_results: Vec<ActionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// The model was unreachable and the fallback reply was sent
    pub degraded: bool,
}

/// Runs chat turns: context, inference, action extraction and dispatch,
/// then persistence of the turn.
pub struct ChatOrchestrator {
    store: Arc<dyn ChatStore>,
    inference: Arc<dyn InferenceClient>,
    dispatcher: ActionDispatcher,
    config: AssistantConfig,
    redactor: PiiRedactor,
}

struct ModelReply {
    text: String,
    calls: Vec<ActionCall>,
    usage: Option<Usage>,
    degraded: bool,
}

impl ChatOrchestrator {
    pub fn new(store: Arc<dyn ChatStore>, inference: Arc<dyn InferenceClient>, config: AssistantConfig) -> Self {
        Self {
            store,
            inference,
            dispatcher: ActionDispatcher::new(),
            config,
            redactor: PiiRedactor::default(),
        }
    }

    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Handle one turn.
    ///
    /// Action failures and inference failures never fail the turn. Store
    /// failures do, and nothing from the turn is persisted in that case.
    pub async fn handle_turn(&self, request: ChatTurnRequest) -> AssistantResult<ChatTurnResponse> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        let patient = self
            .store
            .patient_profile(request.patient_id)
            .await?
            .ok_or(AssistantError::PatientNotFound(request.patient_id))?;

        let session = match request.session_id {
            Some(session_id) => self
                .store
                .chat_session(session_id)
                .await?
                .filter(|session| session.patient_id == patient.patient_id)
                .ok_or(AssistantError::SessionNotFound(session_id))?,
            None => ChatSession::new(patient.patient_id, patient.language()),
        };

        debug!(
            patient_id = %patient.patient_id,
            session_id = %session.id,
            topic = ?request.topic,
            text = %self.redactor.preview(message, LOG_PREVIEW_CHARS),
            "Chat turn received"
        );

        let history = session
            .turns
            .recent(self.config.history_window.saturating_sub(1));
        let messages = assemble_messages(&TurnContext {
            topic: request.topic,
            language: session.language,
            domain_context: request.domain_context.as_deref(),
            history,
            user_message: message,
        });

        let model_reply = self.generate(messages).await;

        let mut tx = self.store.begin().await?;
        let results = self
            .dispatcher
            .dispatch_all(&mut *tx, &patient, &model_reply.calls)
            .await?;
        let reply = annotate_reply(&model_reply.text, &results);

        let now = Utc::now();
        let mut updated = session.clone();
        if session.turns.is_empty() {
            updated.title = Some(session_title(message, self.config.title_max_chars));
        }
        updated.turns = session.turns.extended([
            ChatTurn::user(message, now),
            ChatTurn::assistant(reply.clone(), now).with_actions(model_reply.calls, results.clone()),
        ]);
        updated.updated_at = now;

        tx.replace_session(&updated).await?;
        tx.commit().await?;

        info!(
            patient_id = %patient.patient_id,
            session_id = %updated.id,
            actions = results.len(),
            degraded = model_reply.degraded,
            "Chat turn completed"
        );

        Ok(ChatTurnResponse {
            session_id: updated.id,
            reply,
            action_results: results,
            usage: model_reply.usage,
            degraded: model_reply.degraded,
        })
    }

    async fn generate(&self, messages: Vec<inference_service::ChatMessage>) -> ModelReply {
        let request = GenerationRequest {
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: Some(self.config.top_p),
        };

        match self.inference.generate(request).await {
            Ok(generation) => {
                let extraction = extract_action_calls(&generation.text);
                if extraction.dropped > 0 {
                    warn!(dropped = extraction.dropped, "Dropped malformed action blocks");
                    telemetry::record_dropped_action_blocks(extraction.dropped);
                }
                ModelReply {
                    text: extraction.cleaned_text,
                    calls: extraction.calls,
                    usage: Some(generation.usage),
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "Inference failed, sending fallback reply");
                ModelReply {
                    text: FALLBACK_REPLY.to_string(),
                    calls: Vec::new(),
                    usage: None,
                    degraded: true,
                }
            }
        }
    }
}

/// First `max_chars` characters of the message, with `...` when cut
fn session_title(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let mut title: String = message.chars().take(max_chars).collect();
    title.push_str("...");
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_title() {
        assert_eq!(session_title("Hello", 50), "Hello");
        assert_eq!(session_title("Ekaaro dokita", 3), "Eka...");
        let long = "a".repeat(60);
        assert_eq!(session_title(&long, 50), format!("{}...", "a".repeat(50)));
    }
}
