use assistant_engine::{
    AssistantConfig, ChatOrchestrator, ChatStore, MemoryStore, PgStore, TranscriptCacheManager, TriageAssessor,
    VoiceMessageStore,
};
use database_layer::{DatabaseConfig, DatabasePool};
use error_common::Result;
use inference_service::{HttpInferenceClient, InferenceClient, InferenceConfig, LlmTranslator, Translator};
use logger_redacted::PiiRedactor;
use std::sync::Arc;
use std::time::Instant;
use telemetry::PrometheusHandle;
use tracing::{info, warn};
use voice_recognition_service::{SpeechClient, SpeechConfig, VoiceService};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Inference endpoint configured
    pub inference_configured: bool,
    /// Name of the active speech provider
    pub speech_provider: String,
    /// Whether chat and transcripts are kept in Postgres or in memory
    pub storage: &'static str,
}

/// External collaborators the server is assembled from
pub struct Components {
    pub chat_store: Arc<dyn ChatStore>,
    pub voice_store: Arc<dyn VoiceMessageStore>,
    pub inference: Arc<dyn InferenceClient>,
    pub speech: Arc<dyn SpeechClient>,
    pub assistant: AssistantConfig,
    pub redactor: PiiRedactor,
    pub config: ServerConfig,
}

/// Main Kliniq server state
#[derive(Clone)]
pub struct KliniqServer {
    pub config: ServerConfig,
    pub chat_store: Arc<dyn ChatStore>,
    pub orchestrator: Arc<ChatOrchestrator>,
    pub transcripts: Arc<TranscriptCacheManager>,
    pub translator: Arc<dyn Translator>,
    pub assessor: Arc<TriageAssessor>,
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Instant,
}

impl KliniqServer {
    /// Wire the assistant core on top of the given collaborators
    pub fn new(components: Components) -> Self {
        let Components {
            chat_store,
            voice_store,
            inference,
            speech,
            assistant,
            redactor,
            config,
        } = components;

        let translator: Arc<dyn Translator> = Arc::new(LlmTranslator::new(inference.clone()));
        let orchestrator = ChatOrchestrator::new(chat_store.clone(), inference.clone(), assistant.clone())
            .with_redactor(redactor.clone());
        let transcripts = TranscriptCacheManager::new(
            voice_store,
            speech,
            translator.clone(),
            assistant.concurrent_translations,
        )
        .with_redactor(redactor);
        let assessor = TriageAssessor::new(inference, assistant);

        Self {
            config,
            chat_store,
            orchestrator: Arc::new(orchestrator),
            transcripts: Arc::new(transcripts),
            translator,
            assessor: Arc::new(assessor),
            metrics: None,
            started_at: Instant::now(),
        }
    }

    /// Build the server from environment configuration.
    ///
    /// Uses Postgres when `DATABASE_URL` is set and the in-memory store otherwise.
    ///
    /// # Errors
    ///
    /// Fails when a client cannot be built, the database is unreachable or
    /// migrations fail.
    pub async fn from_env(redactor: PiiRedactor, run_migrations: bool) -> Result<Self> {
        let inference_config = InferenceConfig::from_env();
        let inference = HttpInferenceClient::new(&inference_config)?;
        if !inference.is_configured() {
            warn!("INFERENCE_ENDPOINT_URL not set, chat will answer with the fallback reply");
        }
        let speech = VoiceService::new(SpeechConfig::from_env()?)?;

        let config = ServerConfig {
            name: "Kliniq Assistant".to_string(),
            inference_configured: inference.is_configured(),
            speech_provider: speech.provider_name().to_string(),
            storage: "memory",
        };

        let (chat_store, voice_store, config): (Arc<dyn ChatStore>, Arc<dyn VoiceMessageStore>, ServerConfig) =
            match DatabaseConfig::from_env()? {
                Some(db_config) => {
                    let pool = DatabasePool::new(&db_config).await?;
                    if run_migrations {
                        pool.run_migrations().await?;
                    }
                    let store = PgStore::new(pool);
                    info!("Using PostgreSQL store");
                    (
                        Arc::new(store.clone()),
                        Arc::new(store),
                        ServerConfig {
                            storage: "postgres",
                            ..config
                        },
                    )
                }
                None => {
                    warn!("DATABASE_URL not set, using in-memory store");
                    let store = MemoryStore::new();
                    (Arc::new(store.clone()), Arc::new(store), config)
                }
            };

        Ok(Self::new(Components {
            chat_store,
            voice_store,
            inference: Arc::new(inference),
            speech: Arc::new(speech),
            assistant: AssistantConfig::from_env(&inference_config),
            redactor,
            config,
        }))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
