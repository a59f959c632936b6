//! Multi-provider resolution core for translation and speech synthesis.
//!
//! The rest of the application talks to external translation and
//! text-to-speech services exclusively through [`ProviderHub`]: it picks a
//! healthy provider per capability family, caches that decision, retries a
//! failed call against the next-best provider, and resolves the best
//! available synthetic voice for a target language.

pub mod domain;
pub mod hub;
pub mod infrastructure;

pub use domain::speech::{SpeechAudio, SpeechEngine, SpeechError, SynthesisOptions};
pub use domain::translation::{
    LanguageDetection, SupportedLanguage, Translation, TranslationError, TranslationProvider,
};
pub use hub::ProviderHub;
pub use infrastructure::config::Config;
