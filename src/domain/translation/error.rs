use super::TranslationProvider;
use crate::domain::shared::FallbackError;

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("no translation provider is configured")]
    NotConfigured,

    #[error("translation failed on {provider}: {message}")]
    ProviderFailed {
        provider: TranslationProvider,
        message: String,
    },

    #[error("all translation providers failed. {primary}: {primary_message}. {fallback}: {fallback_message}")]
    AllProvidersFailed {
        primary: TranslationProvider,
        primary_message: String,
        fallback: TranslationProvider,
        fallback_message: String,
    },

    #[error("language detection failed: {0}")]
    DetectionFailed(String),
}

impl From<FallbackError<TranslationProvider>> for TranslationError {
    fn from(err: FallbackError<TranslationProvider>) -> Self {
        match err {
            FallbackError::Failed { provider, message } => {
                TranslationError::ProviderFailed { provider, message }
            }
            FallbackError::Exhausted {
                primary,
                primary_message,
                fallback,
                fallback_message,
            } => TranslationError::AllProvidersFailed {
                primary,
                primary_message,
                fallback,
                fallback_message,
            },
        }
    }
}
