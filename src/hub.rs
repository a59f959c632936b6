use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::speech::{
    EngineStatus, SpeechAudio, SpeechEngine, SpeechError, SpeechService, SynthesisOptions,
};
use crate::domain::translation::{
    LanguageDetection, SelectionSettings, SupportedLanguage, Translation, TranslationError,
    TranslationHealth, TranslationSelector, TranslationService,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{
    DeepLTranslationRepository, KokoroSpeechRepository, LibreTranslateRepository,
    PiperSpeechRepository, SpeechRepository, TranslationRepository,
};

#[derive(Debug, Clone, Serialize)]
pub struct SpeechStatus {
    pub kokoro: EngineStatus,
    pub piper: EngineStatus,
}

/// Read-only diagnostics across both capability families.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub translation: TranslationHealth,
    pub speech: SpeechStatus,
    pub checked_at: DateTime<Utc>,
}

/// The single entry point the rest of the application uses for translation
/// and speech synthesis. Owns provider selection, fallback, and both cache
/// layers; collaborators hand it text and language tags and get typed
/// results or typed errors back.
pub struct ProviderHub {
    translation: TranslationService,
    selector: TranslationSelector,
    speech: SpeechService,
}

impl ProviderHub {
    /// Wire up real HTTP repositories for every configured provider.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let deepl: Option<Arc<dyn TranslationRepository>> =
            config.deepl_api_key.as_ref().map(|key| {
                Arc::new(DeepLTranslationRepository::new(client.clone(), key.clone()))
                    as Arc<dyn TranslationRepository>
            });
        let libretranslate: Option<Arc<dyn TranslationRepository>> =
            config.libretranslate_url.as_ref().map(|url| {
                Arc::new(LibreTranslateRepository::new(client.clone(), url))
                    as Arc<dyn TranslationRepository>
            });
        let kokoro: Option<Arc<dyn SpeechRepository>> = config.kokoro_url.as_ref().map(|url| {
            Arc::new(KokoroSpeechRepository::new(client.clone(), url)) as Arc<dyn SpeechRepository>
        });
        let piper: Option<Arc<dyn SpeechRepository>> = config.piper_url.as_ref().map(|url| {
            Arc::new(PiperSpeechRepository::new(client.clone(), url)) as Arc<dyn SpeechRepository>
        });

        tracing::info!(
            deepl = deepl.is_some(),
            libretranslate = libretranslate.is_some(),
            kokoro = kokoro.is_some(),
            piper = piper.is_some(),
            "provider hub configured"
        );

        let settings = SelectionSettings {
            steady_ttl: Duration::from_secs(config.provider_cache_ttl_secs),
            initial_ttl: Duration::from_secs(config.provider_cache_initial_ttl_secs),
            recheck_delay: Duration::from_secs(config.provider_recheck_delay_secs),
            health_timeout: Duration::from_secs(config.health_check_timeout_secs),
        };

        Ok(Self::new(deepl, libretranslate, kokoro, piper, settings))
    }

    /// Assemble the hub from explicit repositories. This is the seam tests
    /// use to substitute mock providers.
    pub fn new(
        deepl: Option<Arc<dyn TranslationRepository>>,
        libretranslate: Option<Arc<dyn TranslationRepository>>,
        kokoro: Option<Arc<dyn SpeechRepository>>,
        piper: Option<Arc<dyn SpeechRepository>>,
        settings: SelectionSettings,
    ) -> Self {
        let selector = TranslationSelector::new(deepl, libretranslate, settings);
        Self {
            translation: TranslationService::new(selector.clone()),
            selector,
            speech: SpeechService::new(kokoro, piper),
        }
    }

    /// Translate text, transparently picking and if necessary switching the
    /// backing provider. Fails only when every configured provider fails.
    pub async fn translate_text(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<Translation, TranslationError> {
        self.translation
            .translate(text, target_lang, source_lang)
            .await
    }

    /// Detect the language of a text. Always served by the self-hosted
    /// engine; provider selection does not apply.
    pub async fn detect_language(&self, text: &str) -> Result<LanguageDetection, TranslationError> {
        self.translation.detect(text).await
    }

    /// Synthesize speech for a language tag, resolving engine and voice
    /// through the affinity table and the catalog matching cascade.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        language: &str,
        options: &SynthesisOptions,
    ) -> Result<SpeechAudio, SpeechError> {
        self.speech.synthesize(text, language, options).await
    }

    pub async fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslationError> {
        self.translation.supported_languages().await
    }

    /// Drop the provider selection and every voice catalog, forcing fresh
    /// selection and re-fetch on next use. For tests and operational
    /// recovery.
    pub fn clear_caches(&self) {
        self.selector.clear();
        self.speech.clear();
        tracing::info!("provider caches cleared");
    }

    /// Live per-provider diagnostics for status surfaces.
    pub async fn status(&self) -> ServiceStatus {
        ServiceStatus {
            translation: self.selector.health_report().await,
            speech: SpeechStatus {
                kokoro: self.speech.engine_status(SpeechEngine::Kokoro).await,
                piper: self.speech.engine_status(SpeechEngine::Piper).await,
            },
            checked_at: Utc::now(),
        }
    }
}
