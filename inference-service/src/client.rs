use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::InferenceConfig;
use crate::error::{InferenceError, InferenceResult};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body of the chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl GenerationRequest {
    pub fn new(messages: Vec<ChatMessage>, config: &InferenceConfig) -> Self {
        Self {
            messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: Some(config.top_p),
        }
    }
}

/// Token accounting reported by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Generated reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub usage: Usage,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    model: Option<String>,
}

/// Chat-completion seam
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Single round trip; no retry
    async fn generate(&self, request: GenerationRequest) -> InferenceResult<Generation>;
}

/// Chat-completion service reached over HTTP
#[derive(Clone)]
pub struct HttpInferenceClient {
    client: Client,
    endpoint_url: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint_url.is_some()
    }

    async fn round_trip(&self, endpoint: &str, request: &GenerationRequest) -> InferenceResult<Generation> {
        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerationResponse = serde_json::from_str(&body)?;
        Ok(Generation {
            text: parsed.response,
            usage: parsed.usage.unwrap_or_default(),
            model: parsed.model,
        })
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn generate(&self, request: GenerationRequest) -> InferenceResult<Generation> {
        let endpoint = self.endpoint_url.as_deref().ok_or(InferenceError::NotConfigured)?;

        debug!(
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "Calling inference service"
        );

        let started = Instant::now();
        let result = self.round_trip(endpoint, &request).await;
        telemetry::record_inference_duration(started.elapsed(), result.is_ok());

        match &result {
            Ok(generation) => debug!(
                total_tokens = generation.usage.total_tokens,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Inference complete"
            ),
            Err(e) => warn!(error = %e, "Inference request failed"),
        }

        result
    }
}

fn classify(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Timeout
    } else {
        InferenceError::Network(err)
    }
}
