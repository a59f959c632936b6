use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;

use super::voice::{preferred_engine, VoiceCatalog};
use super::{SpeechAudio, SpeechEngine, SpeechError, SynthesisOptions};
use crate::infrastructure::repositories::SpeechRepository;

/// How one engine's attempt went wrong. Separating "no voice" from "call
/// failed" is what lets the service tell `VoiceNotFound` apart from
/// `SynthesisFailed` after the cascade.
enum EngineFailure {
    NoVoice(String),
    Call(String),
}

impl EngineFailure {
    fn message(&self) -> &str {
        match self {
            EngineFailure::NoVoice(message) | EngineFailure::Call(message) => message,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EngineStatus {
    pub configured: bool,
    /// Number of voices in the cached catalog, absent until first use.
    pub cached_voices: Option<usize>,
}

/// Speech-synthesis capability over two interchangeable engines.
///
/// Engine order per request is language affinity (or an explicit override),
/// then the other engine as fallback; within an engine the voice comes from
/// the catalog matching cascade. Catalogs are fetched once per process and
/// concurrent first fetches coalesce into a single call.
pub struct SpeechService {
    kokoro: Option<Arc<dyn SpeechRepository>>,
    piper: Option<Arc<dyn SpeechRepository>>,
    catalogs: Cache<SpeechEngine, Arc<VoiceCatalog>>,
}

impl SpeechService {
    pub fn new(
        kokoro: Option<Arc<dyn SpeechRepository>>,
        piper: Option<Arc<dyn SpeechRepository>>,
    ) -> Self {
        Self {
            kokoro,
            piper,
            catalogs: Cache::builder().max_capacity(2).build(),
        }
    }

    fn repository(&self, engine: SpeechEngine) -> Option<Arc<dyn SpeechRepository>> {
        match engine {
            SpeechEngine::Kokoro => self.kokoro.clone(),
            SpeechEngine::Piper => self.piper.clone(),
        }
    }

    fn is_configured(&self, engine: SpeechEngine) -> bool {
        self.repository(engine).is_some()
    }

    /// Engines to try, in order: the explicit override or the
    /// affinity-preferred engine first, then the other one. Unconfigured
    /// engines are skipped.
    fn engine_order(&self, language: &str, options: &SynthesisOptions) -> Vec<SpeechEngine> {
        let preferred = options.engine.unwrap_or_else(|| preferred_engine(language));
        [preferred, preferred.other()]
            .into_iter()
            .filter(|engine| self.is_configured(*engine))
            .collect()
    }

    /// The engine's voice catalog, fetched on first use and cached for the
    /// process lifetime. Concurrent first uses share one fetch.
    pub async fn voice_catalog(&self, engine: SpeechEngine) -> Result<Arc<VoiceCatalog>, String> {
        let Some(repo) = self.repository(engine) else {
            return Err(format!("{engine} is not configured"));
        };

        self.catalogs
            .try_get_with(engine, async move {
                let catalog = repo.list_voices().await?;
                tracing::info!(engine = %engine, voices = catalog.len(), "voice catalog fetched");
                Ok::<_, String>(Arc::new(catalog))
            })
            .await
            .map_err(|e: Arc<String>| (*e).clone())
    }

    async fn attempt(
        &self,
        engine: SpeechEngine,
        text: &str,
        language: &str,
        options: &SynthesisOptions,
    ) -> Result<SpeechAudio, EngineFailure> {
        let Some(repo) = self.repository(engine) else {
            return Err(EngineFailure::Call(format!("{engine} is not configured")));
        };

        let voice = match &options.voice {
            Some(voice) => voice.clone(),
            None => {
                let catalog = self
                    .voice_catalog(engine)
                    .await
                    .map_err(EngineFailure::NoVoice)?;
                let normalized = repo.normalize_language(language);
                match catalog.best_voice(&normalized) {
                    Some(voice) => voice.to_string(),
                    None => {
                        return Err(EngineFailure::NoVoice(format!(
                            "no voice for language {language} in the {engine} catalog"
                        )))
                    }
                }
            }
        };

        tracing::debug!(
            engine = %engine,
            voice = %voice,
            language,
            text_length = text.len(),
            "synthesizing speech"
        );

        match repo.synthesize(text, &voice, options).await {
            Ok(audio) => Ok(SpeechAudio {
                content_length: audio.bytes.len(),
                audio: audio.bytes,
                content_type: audio.content_type,
                engine,
                voice,
            }),
            Err(message) => Err(EngineFailure::Call(message)),
        }
    }

    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        options: &SynthesisOptions,
    ) -> Result<SpeechAudio, SpeechError> {
        let order = self.engine_order(language, options);
        if order.is_empty() {
            return Err(SpeechError::NotConfigured);
        }

        let mut failures: Vec<(SpeechEngine, EngineFailure)> = Vec::new();
        for engine in order {
            match self.attempt(engine, text, language, options).await {
                Ok(audio) => {
                    if !failures.is_empty() {
                        tracing::warn!(
                            engine = %engine,
                            failed = %failures[0].0,
                            "speech synthesis recovered on fallback engine"
                        );
                    }
                    tracing::info!(
                        engine = %audio.engine,
                        voice = %audio.voice,
                        language,
                        audio_size = audio.content_length,
                        content_type = %audio.content_type,
                        "speech synthesis completed"
                    );
                    return Ok(audio);
                }
                Err(failure) => {
                    tracing::warn!(
                        engine = %engine,
                        error = failure.message(),
                        language,
                        "speech synthesis attempt failed"
                    );
                    failures.push((engine, failure));
                }
            }
        }

        // Every engine failed. No engine even resolving a voice means the
        // request is unsatisfiable as asked; anything else is a call failure.
        if failures
            .iter()
            .all(|(_, f)| matches!(f, EngineFailure::NoVoice(_)))
        {
            return Err(SpeechError::VoiceNotFound {
                language: language.to_string(),
            });
        }

        let mut failures = failures.into_iter();
        let (primary, primary_failure) = failures
            .next()
            .expect("cascade recorded at least one failure");
        match failures.next() {
            Some((fallback, fallback_failure)) => Err(SpeechError::AllEnginesFailed {
                primary,
                primary_message: primary_failure.message().to_string(),
                fallback,
                fallback_message: fallback_failure.message().to_string(),
            }),
            None => Err(SpeechError::SynthesisFailed {
                engine: primary,
                message: primary_failure.message().to_string(),
            }),
        }
    }

    /// Drop all cached voice catalogs, forcing a re-fetch on next use.
    pub fn clear(&self) {
        self.catalogs.invalidate_all();
    }

    pub async fn engine_status(&self, engine: SpeechEngine) -> EngineStatus {
        EngineStatus {
            configured: self.is_configured(engine),
            cached_voices: self.catalogs.get(&engine).await.map(|c| c.len()),
        }
    }
}
