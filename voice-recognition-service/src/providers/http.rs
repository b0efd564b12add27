use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{VoiceError, VoiceResult};
use crate::providers::SpeechProvider;
use crate::transcription::{AsrResponse, TranscriptionRequest, TranscriptionResult};

/// ASR service reached over HTTP with a JSON body
pub struct HttpAsrProvider {
    client: Client,
    endpoint_url: Option<String>,
    api_key: Option<String>,
}

impl HttpAsrProvider {
    pub fn new(
        endpoint_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> VoiceResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint_url,
            api_key,
        })
    }
}

#[async_trait]
impl SpeechProvider for HttpAsrProvider {
    async fn transcribe(&self, request: &TranscriptionRequest) -> VoiceResult<TranscriptionResult> {
        let endpoint = self.endpoint_url.as_deref().ok_or(VoiceError::NotConfigured)?;

        debug!(language = %request.language, "Sending transcription request");

        let mut builder = self.client.post(endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                VoiceError::Timeout
            } else {
                VoiceError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "ASR endpoint returned an error status");
            return Err(VoiceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                VoiceError::Timeout
            } else {
                VoiceError::Network(e)
            }
        })?;
        let parsed: AsrResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(VoiceError::Transcription(error));
        }

        let language = parsed
            .language
            .and_then(|code| code.parse().ok())
            .unwrap_or(request.language);

        Ok(TranscriptionResult {
            text: parsed.text.trim().to_string(),
            language,
            model: parsed.model,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
