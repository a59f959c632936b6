use async_trait::async_trait;

use crate::domain::translation::{LanguageDetection, SupportedLanguage};

/// Repository for translation operations.
/// Abstracts the underlying provider (DeepL, LibreTranslate, ...).
///
/// Implementations are responsible for:
/// - Provider-specific language-code mapping
/// - Bounding every call with a request timeout
/// - Keeping the health check cheap (it steers selection, not traffic)
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Translate text into the target language. Omitting `source` lets the
    /// provider auto-detect it.
    ///
    /// # Errors
    /// Returns the provider's failure message; a timeout reads the same as
    /// any other failure to the caller.
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, String>;

    /// Detect the language of the given text. Providers without a detection
    /// endpoint keep this default.
    async fn detect(&self, _text: &str) -> Result<LanguageDetection, String> {
        Err("language detection is not supported by this provider".to_string())
    }

    /// Languages the provider can translate between. Providers without a
    /// listing endpoint keep this default.
    async fn languages(&self) -> Result<Vec<SupportedLanguage>, String> {
        Err("language listing is not supported by this provider".to_string())
    }

    /// Lightweight call used to decide whether the provider is usable.
    async fn health_check(&self) -> Result<(), String>;
}
