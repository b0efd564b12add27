use chrono::{DateTime, Utc};
use inference_service::{GenerationRequest, InferenceClient};
use kliniq_types::Language;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::actions::extract_action_calls;
use crate::config::AssistantConfig;
use crate::context::{assemble_messages, ChatTopic, TurnContext};
use crate::error::{AssistantError, AssistantResult};

const ASSESSMENT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub assessment: String,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

/// One-shot symptom assessment outside of a chat session.
///
/// Nothing is persisted and action blocks in the reply are discarded.
pub struct TriageAssessor {
    inference: Arc<dyn InferenceClient>,
    config: AssistantConfig,
}

impl TriageAssessor {
    pub fn new(inference: Arc<dyn InferenceClient>, config: AssistantConfig) -> Self {
        Self { inference, config }
    }

    pub async fn assess(
        &self,
        symptoms: &str,
        language: Language,
        additional_info: Option<&str>,
    ) -> AssistantResult<TriageAssessment> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        let prompt = assessment_prompt(symptoms, additional_info);
        let messages = assemble_messages(&TurnContext {
            topic: ChatTopic::Triage,
            language,
            domain_context: None,
            history: &[],
            user_message: &prompt,
        });

        let generation = self
            .inference
            .generate(GenerationRequest {
                messages,
                max_tokens: self.config.max_tokens,
                temperature: ASSESSMENT_TEMPERATURE,
                top_p: Some(self.config.top_p),
            })
            .await?;

        let extraction = extract_action_calls(&generation.text);
        info!(
            language = %language,
            ignored_actions = extraction.calls.len(),
            "Triage assessment generated"
        );

        Ok(TriageAssessment {
            assessment: extraction.cleaned_text,
            language,
            timestamp: Utc::now(),
        })
    }
}

fn assessment_prompt(symptoms: &str, additional_info: Option<&str>) -> String {
    let mut prompt = format!("Patient symptoms: {}", symptoms);
    if let Some(info) = additional_info.map(str::trim).filter(|i| !i.is_empty()) {
        prompt.push_str("\nAdditional information: ");
        prompt.push_str(info);
    }
    prompt.push_str(
        "\n\nPlease provide: 1) Brief symptom assessment 2) Urgency level (low/medium/high) 3) Recommended next steps",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_service::{ChatRole, Generation, InferenceError, InferenceResult, Usage};
    use mockall::mock;

    mock! {
        Client {}

        #[async_trait::async_trait]
        impl InferenceClient for Client {
            async fn generate(&self, request: GenerationRequest) -> InferenceResult<Generation>;
        }
    }

    #[test]
    fn test_prompt_includes_additional_info() {
        let prompt = assessment_prompt("fever", Some("started yesterday"));
        assert!(prompt.starts_with("Patient symptoms: fever\nAdditional information: started yesterday\n\n"));
        assert!(!assessment_prompt("fever", Some(" ")).contains("Additional information"));
    }

    #[tokio::test]
    async fn test_assessment_uses_triage_topic_and_low_temperature() {
        let mut client = MockClient::new();
        client
            .expect_generate()
            .withf(|request| {
                request.temperature == ASSESSMENT_TEMPERATURE
                    && request.messages.len() == 2
                    && request.messages[0].role == ChatRole::System
                    && request.messages[0].content.contains("triage assistant")
                    && request.messages[0].content.contains("PREFERRED LANGUAGE: Igbo")
            })
            .times(1)
            .returning(|_| {
                Ok(Generation {
                    text: "Urgency: medium.\n<TOOL_CALL>{\"tool\": \"create_triage\"}</TOOL_CALL>".into(),
                    usage: Usage::default(),
                    model: None,
                })
            });

        let assessor = TriageAssessor::new(Arc::new(client), AssistantConfig::default());
        let assessment = assessor.assess("headache", Language::Igbo, None).await.unwrap();

        assert_eq!(assessment.assessment, "Urgency: medium.");
        assert_eq!(assessment.language, Language::Igbo);
    }

    #[tokio::test]
    async fn test_inference_errors_propagate() {
        let mut client = MockClient::new();
        client
            .expect_generate()
            .returning(|_| Err(InferenceError::NotConfigured));

        let assessor = TriageAssessor::new(Arc::new(client), AssistantConfig::default());
        let err = assessor.assess("headache", Language::English, None).await.unwrap_err();
        assert!(matches!(err, AssistantError::Inference(InferenceError::NotConfigured)));
    }
}
