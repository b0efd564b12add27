pub mod disabled;
pub mod http;

use async_trait::async_trait;

use crate::config::{SpeechConfig, SpeechProviderConfig};
use crate::error::VoiceResult;
use crate::transcription::{TranscriptionRequest, TranscriptionResult};

/// Trait for speech recognition providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Transcribe the audio behind `request.audio_url`
    async fn transcribe(&self, request: &TranscriptionRequest) -> VoiceResult<TranscriptionResult>;

    fn name(&self) -> &'static str;
}

/// Create a provider instance based on configuration
pub fn create_provider(config: &SpeechConfig) -> VoiceResult<Box<dyn SpeechProvider>> {
    match &config.provider {
        SpeechProviderConfig::Http {
            endpoint_url,
            api_key,
        } => Ok(Box::new(http::HttpAsrProvider::new(
            endpoint_url.clone(),
            api_key.clone(),
            config.timeout(),
        )?)),
        SpeechProviderConfig::Disabled => Ok(Box::new(disabled::DisabledProvider)),
    }
}
