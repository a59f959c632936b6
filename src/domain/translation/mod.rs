pub mod error;
pub mod selection;
pub mod service;

pub use error::TranslationError;
pub use selection::{ProviderHealth, SelectionSettings, TranslationHealth, TranslationSelector};
pub use service::TranslationService;

use serde::{Deserialize, Serialize};

/// Configured translation backends, in descending priority order: the paid
/// engine is preferred over the self-hosted one whenever it is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    DeepL,
    LibreTranslate,
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TranslationProvider::DeepL => "deepl",
            TranslationProvider::LibreTranslate => "libretranslate",
        };
        write!(f, "{name}")
    }
}

/// A translated string tagged with the provider that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub text: String,
    pub provider: TranslationProvider,
}

/// Language detection result as reported by the detecting provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub language: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedLanguage {
    pub code: String,
    pub name: String,
}
