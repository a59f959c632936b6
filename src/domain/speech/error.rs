use super::SpeechEngine;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("no speech-synthesis engine is configured")]
    NotConfigured,

    /// The matching cascade exhausted every tier on every engine without
    /// producing a voice. Distinct from a synthesis failure: no call was
    /// ever attempted.
    #[error("no suitable voice found for language {language}")]
    VoiceNotFound { language: String },

    #[error("speech synthesis failed on {engine}: {message}")]
    SynthesisFailed { engine: SpeechEngine, message: String },

    #[error("speech synthesis failed on all engines. {primary}: {primary_message}. {fallback}: {fallback_message}")]
    AllEnginesFailed {
        primary: SpeechEngine,
        primary_message: String,
        fallback: SpeechEngine,
        fallback_message: String,
    },
}
