use serde::Serialize;

use super::SpeechEngine;

/// Primary subtag of a `language[_REGION]` tag: everything before the first
/// separator (`de` for `de_DE`).
pub fn language_family(tag: &str) -> &str {
    tag.split('_').next().unwrap_or(tag)
}

/// Languages whose voices are noticeably better on the Kokoro engine.
/// Everything else defaults to Piper.
pub fn prefers_kokoro(tag: &str) -> bool {
    let family = language_family(tag).to_ascii_lowercase();
    matches!(
        family.as_str(),
        "ja" | "ko" | "zh" | "japanese" | "korean" | "chinese"
    )
}

/// One synthetic voice in a provider's catalog.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceEntry {
    pub id: String,
    /// Full language tag (`en_US`), when the provider reports one.
    pub language: Option<String>,
    pub region: Option<String>,
    pub gender: Option<String>,
}

/// A speech provider's available voices, in the provider's listing order.
/// Fetched once per process and cached; insertion order matters because the
/// last-resort match tier returns the first entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VoiceCatalog {
    entries: Vec<VoiceEntry>,
}

impl VoiceCatalog {
    pub fn new(entries: Vec<VoiceEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[VoiceEntry] {
        &self.entries
    }

    fn exact(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.language.as_deref() == Some(tag))
            .map(|e| e.id.as_str())
    }

    fn family(&self, family: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| {
                e.language
                    .as_deref()
                    .is_some_and(|lang| language_family(lang) == family)
            })
            .map(|e| e.id.as_str())
    }

    /// Pick the best voice for a language tag.
    ///
    /// Tiered cascade, deterministic for a fixed catalog: exact tag match,
    /// then language-family match, then the English tiers (`en_US` exact,
    /// `en` family) unless the request already is an English variant, and
    /// finally the first catalog entry regardless of language. Returns
    /// `None` only for an empty catalog.
    ///
    /// The unconditional last tier can hand back a voice unrelated to the
    /// request; that "always return something usable" behavior is a product
    /// decision, kept as-is.
    pub fn best_voice(&self, tag: &str) -> Option<&str> {
        if let Some(id) = self.exact(tag) {
            tracing::debug!(voice = id, language = tag, "exact voice match");
            return Some(id);
        }

        let family = language_family(tag);
        if let Some(id) = self.family(family) {
            tracing::debug!(voice = id, family, "language family voice match");
            return Some(id);
        }

        if tag != "en" && tag != "en_US" {
            if let Some(id) = self.exact("en_US").or_else(|| self.family("en")) {
                tracing::debug!(voice = id, language = tag, "english fallback voice");
                return Some(id);
            }
        }

        let first = self.entries.first().map(|e| e.id.as_str());
        if let Some(id) = first {
            tracing::debug!(voice = id, language = tag, "first catalog entry as last resort");
        }
        first
    }
}

/// Which engine family to try first for a language, before any per-request
/// override is applied.
pub fn preferred_engine(tag: &str) -> SpeechEngine {
    if prefers_kokoro(tag) {
        SpeechEngine::Kokoro
    } else {
        SpeechEngine::Piper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(id: &str, language: &str) -> VoiceEntry {
        VoiceEntry {
            id: id.to_string(),
            language: Some(language.to_string()),
            region: None,
            gender: None,
        }
    }

    #[test]
    fn family_strips_region() {
        assert_eq!(language_family("de_DE"), "de");
        assert_eq!(language_family("en"), "en");
        assert_eq!(language_family("zh_CN"), "zh");
        assert_eq!(language_family(""), "");
    }

    #[test]
    fn exact_match_wins_over_family() {
        let catalog = VoiceCatalog::new(vec![
            entry("us-voice", "en_US"),
            entry("gb-voice", "en_GB"),
        ]);
        assert_eq!(catalog.best_voice("en_GB"), Some("gb-voice"));
    }

    #[test]
    fn family_match_when_exact_missing() {
        let catalog = VoiceCatalog::new(vec![entry("us-voice", "en_US")]);
        assert_eq!(catalog.best_voice("en_GB"), Some("us-voice"));
    }

    #[test]
    fn english_tiers_take_priority_over_last_resort() {
        let catalog = VoiceCatalog::new(vec![
            entry("fr-voice", "fr_FR"),
            entry("us-voice", "en_US"),
        ]);
        // No German voice: the en_US tier answers before the first-entry
        // tier would have returned the French voice.
        assert_eq!(catalog.best_voice("de_DE"), Some("us-voice"));
    }

    #[test]
    fn english_family_answers_when_en_us_absent() {
        let catalog = VoiceCatalog::new(vec![
            entry("fr-voice", "fr_FR"),
            entry("gb-voice", "en_GB"),
        ]);
        assert_eq!(catalog.best_voice("de_DE"), Some("gb-voice"));
    }

    #[test]
    fn unrelated_first_entry_is_the_last_resort() {
        let catalog = VoiceCatalog::new(vec![entry("fr-voice", "fr_FR")]);
        assert_eq!(catalog.best_voice("de_DE"), Some("fr-voice"));
    }

    #[test]
    fn english_request_skips_english_fallback_tier() {
        // An en_US request against a catalog with no English voice goes
        // straight to the last resort instead of re-running the English
        // tiers it already failed.
        let catalog = VoiceCatalog::new(vec![entry("fr-voice", "fr_FR")]);
        assert_eq!(catalog.best_voice("en_US"), Some("fr-voice"));
        assert_eq!(catalog.best_voice("en"), Some("fr-voice"));
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let catalog = VoiceCatalog::default();
        assert_eq!(catalog.best_voice("en_US"), None);
    }

    #[test]
    fn matching_is_idempotent() {
        let catalog = VoiceCatalog::new(vec![
            entry("a", "es_ES"),
            entry("b", "es_MX"),
            entry("c", "en_US"),
        ]);
        let first = catalog.best_voice("es").map(str::to_string);
        for _ in 0..10 {
            assert_eq!(catalog.best_voice("es").map(str::to_string), first);
        }
        assert_eq!(first.as_deref(), Some("a"));
    }

    #[test]
    fn entries_without_language_only_serve_the_last_resort() {
        let catalog = VoiceCatalog::new(vec![
            VoiceEntry {
                id: "mystery".to_string(),
                language: None,
                region: None,
                gender: None,
            },
            entry("us-voice", "en_US"),
        ]);
        assert_eq!(catalog.best_voice("en_US"), Some("us-voice"));
        // Nothing matches Thai, not even the English tiers... the first
        // entry still answers.
        let catalog = VoiceCatalog::new(vec![VoiceEntry {
            id: "mystery".to_string(),
            language: None,
            region: None,
            gender: None,
        }]);
        assert_eq!(catalog.best_voice("th"), Some("mystery"));
    }

    #[test]
    fn kokoro_affinity_covers_east_asian_families() {
        assert!(prefers_kokoro("ja"));
        assert!(prefers_kokoro("ja_JP"));
        assert!(prefers_kokoro("ko_KR"));
        assert!(prefers_kokoro("zh_CN"));
        assert!(prefers_kokoro("Japanese"));
        assert!(!prefers_kokoro("en_US"));
        assert!(!prefers_kokoro("de"));
    }

    #[test]
    fn preferred_engine_defaults_to_piper() {
        assert_eq!(preferred_engine("fr_FR"), SpeechEngine::Piper);
        assert_eq!(preferred_engine("zh_CN"), SpeechEngine::Kokoro);
    }
}
