use async_trait::async_trait;

use crate::domain::speech::{SynthesisOptions, VoiceCatalog};

/// Raw synthesis output as produced by a speech provider.
#[derive(Debug, Clone)]
pub struct AudioData {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Repository for speech-synthesis operations.
/// Abstracts the underlying engine (Kokoro, Piper, ...).
///
/// Implementations are responsible for:
/// - Translating their native voice listing into a [`VoiceCatalog`],
///   preserving the provider's listing order
/// - Applying engine defaults for unset synthesis options
/// - Bounding every call with a request timeout
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Fetch the engine's available voices. Called once per process per
    /// engine; the result is cached by the speech service.
    async fn list_voices(&self) -> Result<VoiceCatalog, String>;

    /// Synthesize text with a specific voice.
    ///
    /// # Errors
    /// Returns the engine's failure message; a timeout reads the same as
    /// any other failure to the caller.
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        options: &SynthesisOptions,
    ) -> Result<AudioData, String>;

    /// Per-engine adjustment of a requested language tag before catalog
    /// matching. Engines approximating one language with another's voices
    /// override this.
    fn normalize_language(&self, tag: &str) -> String {
        tag.to_string()
    }
}
