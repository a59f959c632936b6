use super::selection::TranslationSelector;
use super::{LanguageDetection, SupportedLanguage, Translation, TranslationError};
use crate::domain::shared::with_fallback;

/// Translation capability over interchangeable backends, with automatic
/// fallback: a failed call is retried once against the next-priority
/// provider within the same request, and a successful recovery rewrites the
/// selection cache so later requests skip the known-bad provider.
pub struct TranslationService {
    selector: TranslationSelector,
}

impl TranslationService {
    pub fn new(selector: TranslationSelector) -> Self {
        Self { selector }
    }

    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<Translation, TranslationError> {
        let primary = self.selector.select().await?;
        let fallback = self.selector.fallback_for(primary);

        tracing::debug!(
            provider = %primary,
            target = target_lang,
            source = source_lang.unwrap_or("auto"),
            text_length = text.len(),
            "translation request"
        );

        let outcome = with_fallback(primary, fallback, |provider| {
            let repo = self.selector.repository(provider);
            async move {
                match repo {
                    Some(repo) => repo.translate(text, target_lang, source_lang).await,
                    None => Err(format!("{provider} is not configured")),
                }
            }
        })
        .await?;

        if outcome.recovered {
            self.selector.record_fallback(outcome.provider);
        }

        tracing::info!(
            provider = %outcome.provider,
            recovered = outcome.recovered,
            target = target_lang,
            text_length = text.len(),
            "translation completed"
        );

        Ok(Translation {
            text: outcome.value,
            provider: outcome.provider,
        })
    }

    /// Detection always goes to the self-hosted engine: the paid one offers
    /// no detection endpoint, so provider selection does not apply here.
    pub async fn detect(&self, text: &str) -> Result<LanguageDetection, TranslationError> {
        let repo = self
            .selector
            .detector()
            .ok_or(TranslationError::NotConfigured)?;

        let detection = repo
            .detect(text)
            .await
            .map_err(TranslationError::DetectionFailed)?;

        tracing::debug!(
            language = %detection.language,
            confidence = detection.confidence,
            text_length = text.len(),
            "language detected"
        );

        Ok(detection)
    }

    /// The self-hosted engine is authoritative for the supported-language
    /// list; the paid engine's set is a subset of it.
    pub async fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslationError> {
        let repo = self
            .selector
            .detector()
            .ok_or(TranslationError::NotConfigured)?;

        repo.languages().await.map_err(|message| {
            TranslationError::ProviderFailed {
                provider: super::TranslationProvider::LibreTranslate,
                message,
            }
        })
    }
}
