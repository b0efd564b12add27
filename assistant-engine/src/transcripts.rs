//! Per-message, per-language transcript cache for voice messages
//!
//! The first request for an uncached message transcribes it once in the
//! spoken language and translates into every other supported language that is
//! still missing. Later requests for any cached language are served without a
//! network call. Overriding the spoken language empties the whole map, since
//! every translation derived from a wrong guess is wrong as well.

use dashmap::DashMap;
use futures::future::join_all;
use inference_service::{TranslationResult, Translator};
use kliniq_types::Language;
use logger_redacted::PiiRedactor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;
use voice_recognition_service::SpeechClient;

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::{TranscriptEntry, TranscriptOrigin, VoiceMessage};
use crate::store::VoiceMessageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRequest {
    pub message_id: Uuid,
    pub view_language: Language,
    /// Corrects the spoken language and invalidates every cached transcript
    pub override_language: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptView {
    pub text: String,
    pub language: Language,
    pub original_language: Option<Language>,
    /// Served from the cache without any network call
    pub cached: bool,
    pub translated: bool,
    /// Languages holding the untranslated origin text
    pub fallback_languages: Vec<Language>,
}

impl TranscriptView {
    fn from_message(message: &VoiceMessage, language: Language, text: String, cached: bool) -> Self {
        Self {
            text,
            language,
            original_language: message.original_language,
            cached,
            translated: message.original_language != Some(language),
            fallback_languages: message.fallback_languages(),
        }
    }
}

pub struct TranscriptCacheManager {
    store: Arc<dyn VoiceMessageStore>,
    speech: Arc<dyn SpeechClient>,
    translator: Arc<dyn Translator>,
    concurrent: bool,
    /// Per-message population locks
    in_flight: DashMap<Uuid, Arc<Mutex<()>>>,
    redactor: PiiRedactor,
}

impl TranscriptCacheManager {
    pub fn new(
        store: Arc<dyn VoiceMessageStore>,
        speech: Arc<dyn SpeechClient>,
        translator: Arc<dyn Translator>,
        concurrent: bool,
    ) -> Self {
        Self {
            store,
            speech,
            translator,
            concurrent,
            in_flight: DashMap::new(),
            redactor: PiiRedactor::default(),
        }
    }

    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Serve a transcript, populating or invalidating the cache as needed
    pub async fn get_transcript(&self, request: TranscriptRequest) -> TranscriptResult<TranscriptView> {
        let message = self.load(request.message_id).await?;

        if request.override_language.is_none() {
            if let Some(view) = cached_view(&message, request.view_language) {
                telemetry::record_transcript_cache(true);
                return Ok(view);
            }
        }

        let lock = self
            .in_flight
            .entry(request.message_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let outcome = {
            let _guard = lock.lock().await;
            self.populate(request).await
        };

        self.in_flight
            .remove_if(&request.message_id, |_, entry| Arc::strong_count(entry) == 2);

        // Waiters served from the reloaded cache count as hits
        telemetry::record_transcript_cache(outcome.as_ref().is_ok_and(|view| view.cached));

        outcome
    }

    async fn load(&self, message_id: Uuid) -> TranscriptResult<VoiceMessage> {
        let message = self
            .store
            .voice_message(message_id)
            .await?
            .ok_or(TranscriptError::MessageNotFound(message_id))?;

        let has_audio = message
            .attachment_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if !has_audio {
            return Err(TranscriptError::NoAudioAttachment(message_id));
        }
        Ok(message)
    }

    /// Runs with the message lock held
    async fn populate(&self, request: TranscriptRequest) -> TranscriptResult<TranscriptView> {
        // Reload: a previous holder of the lock may have filled the cache
        let mut message = self.load(request.message_id).await?;
        let mut dirty = false;

        match request.override_language {
            Some(spoken) => {
                info!(
                    message_id = %message.id,
                    previous = ?message.original_language,
                    spoken = %spoken,
                    "Spoken language overridden, clearing transcripts"
                );
                message.original_language = Some(spoken);
                message.transcripts.clear();
                dirty = true;
            }
            None => {
                if let Some(view) = cached_view(&message, request.view_language) {
                    return Ok(view);
                }
                if message.original_language.is_none() {
                    message.original_language = Some(Language::default());
                    dirty = true;
                }
            }
        }

        let spoken = message.original_language.unwrap_or_default();
        let origin_text = match message.transcripts.get(&spoken) {
            Some(entry) => entry.text.clone(),
            None => {
                let audio_url = message.attachment_url.clone().unwrap_or_default();
                match self.speech.transcribe(&audio_url, spoken).await {
                    Ok(result) => {
                        message.transcripts.insert(
                            spoken,
                            TranscriptEntry {
                                text: result.text.clone(),
                                origin: TranscriptOrigin::Transcribed,
                            },
                        );
                        result.text
                    }
                    Err(e) => {
                        if dirty {
                            self.store.save_voice_message(&message).await?;
                        }
                        return Err(e.into());
                    }
                }
            }
        };

        let missing: Vec<Language> = spoken
            .others()
            .filter(|language| !message.transcripts.contains_key(language))
            .collect();

        if origin_text.trim().is_empty() {
            for language in missing {
                message.transcripts.insert(
                    language,
                    TranscriptEntry {
                        text: origin_text.clone(),
                        origin: TranscriptOrigin::Translated,
                    },
                );
            }
        } else {
            for (language, outcome) in self.translate_missing(&origin_text, spoken, &missing).await {
                let entry = match outcome {
                    Ok(text) => TranscriptEntry {
                        text,
                        origin: TranscriptOrigin::Translated,
                    },
                    Err(e) => {
                        warn!(
                            message_id = %message.id,
                            from = %spoken,
                            to = %language,
                            error = %e,
                            "Translation failed, caching origin text"
                        );
                        telemetry::record_translation_fallback(language.code());
                        TranscriptEntry {
                            text: origin_text.clone(),
                            origin: TranscriptOrigin::Fallback,
                        }
                    }
                };
                message.transcripts.insert(language, entry);
            }
        }

        self.store.save_voice_message(&message).await?;

        debug!(
            message_id = %message.id,
            spoken = %spoken,
            languages = message.transcripts.len(),
            text = %self.redactor.preview(&origin_text, 80),
            "Transcript cache populated"
        );

        let text = message
            .transcripts
            .get(&request.view_language)
            .map(|entry| entry.text.clone())
            .unwrap_or(origin_text);
        Ok(TranscriptView::from_message(&message, request.view_language, text, false))
    }

    async fn translate_missing(
        &self,
        text: &str,
        from: Language,
        targets: &[Language],
    ) -> Vec<(Language, TranslationResult<String>)> {
        if self.concurrent {
            join_all(targets.iter().map(|&to| async move {
                (to, self.translator.translate(text, from, to).await)
            }))
            .await
        } else {
            let mut outcomes = Vec::with_capacity(targets.len());
            for &to in targets {
                outcomes.push((to, self.translator.translate(text, from, to).await));
            }
            outcomes
        }
    }
}

fn cached_view(message: &VoiceMessage, language: Language) -> Option<TranscriptView> {
    message
        .transcripts
        .get(&language)
        .map(|entry| TranscriptView::from_message(message, language, entry.text.clone(), true))
}
