#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use polyglot_providers::domain::speech::{SynthesisOptions, VoiceCatalog, VoiceEntry};
use polyglot_providers::domain::translation::{
    LanguageDetection, SelectionSettings, SupportedLanguage,
};
use polyglot_providers::infrastructure::repositories::{
    AudioData, SpeechRepository, TranslationRepository,
};
use polyglot_providers::ProviderHub;

/// Opt into provider logs for a test run via RUST_LOG.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn test_settings() -> SelectionSettings {
    SelectionSettings {
        steady_ttl: Duration::from_secs(3600),
        initial_ttl: Duration::from_secs(600),
        recheck_delay: Duration::from_secs(5),
        health_timeout: Duration::from_secs(5),
    }
}

/// Mock translation backend with per-call counters and runtime failure
/// switches, injected at the repository seam.
pub struct MockTranslationRepository {
    pub label: &'static str,
    pub translate_calls: AtomicUsize,
    pub detect_calls: AtomicUsize,
    pub health_calls: AtomicUsize,
    fail_translate: AtomicBool,
    fail_health: AtomicBool,
}

impl MockTranslationRepository {
    pub fn healthy(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            translate_calls: AtomicUsize::new(0),
            detect_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
            fail_translate: AtomicBool::new(false),
            fail_health: AtomicBool::new(false),
        })
    }

    pub fn set_fail_translate(&self, fail: bool) {
        self.fail_translate.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_health(&self, fail: bool) {
        self.fail_health.store(fail, Ordering::SeqCst);
    }

    pub fn translate_count(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    pub fn health_count(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn detect_count(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationRepository for MockTranslationRepository {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        _source_lang: Option<&str>,
    ) -> Result<String, String> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_translate.load(Ordering::SeqCst) {
            Err(format!("{} translation exploded", self.label))
        } else {
            Ok(format!("[{}->{target_lang}] {text}", self.label))
        }
    }

    async fn detect(&self, _text: &str) -> Result<LanguageDetection, String> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(LanguageDetection {
            language: "es".to_string(),
            confidence: 98.0,
        })
    }

    async fn languages(&self) -> Result<Vec<SupportedLanguage>, String> {
        Ok(vec![
            SupportedLanguage {
                code: "en".to_string(),
                name: "English".to_string(),
            },
            SupportedLanguage {
                code: "es".to_string(),
                name: "Spanish".to_string(),
            },
        ])
    }

    async fn health_check(&self) -> Result<(), String> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_health.load(Ordering::SeqCst) {
            Err(format!("{} health check exploded", self.label))
        } else {
            Ok(())
        }
    }
}

/// Mock speech engine with a fixed catalog and runtime failure switches.
pub struct MockSpeechRepository {
    pub label: &'static str,
    catalog: VoiceCatalog,
    pub list_calls: AtomicUsize,
    pub synthesize_calls: AtomicUsize,
    fail_synthesize: AtomicBool,
    fail_list: AtomicBool,
}

impl MockSpeechRepository {
    pub fn with_catalog(label: &'static str, entries: Vec<VoiceEntry>) -> Arc<Self> {
        Arc::new(Self {
            label,
            catalog: VoiceCatalog::new(entries),
            list_calls: AtomicUsize::new(0),
            synthesize_calls: AtomicUsize::new(0),
            fail_synthesize: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
        })
    }

    pub fn set_fail_synthesize(&self, fail: bool) {
        self.fail_synthesize.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn synthesize_count(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRepository for MockSpeechRepository {
    async fn list_voices(&self) -> Result<VoiceCatalog, String> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_list.load(Ordering::SeqCst) {
            Err(format!("{} voice listing exploded", self.label))
        } else {
            Ok(self.catalog.clone())
        }
    }

    async fn synthesize(
        &self,
        _text: &str,
        voice: &str,
        _options: &SynthesisOptions,
    ) -> Result<AudioData, String> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_synthesize.load(Ordering::SeqCst) {
            Err(format!("{} synthesis exploded", self.label))
        } else {
            Ok(AudioData {
                bytes: format!("{}:{voice}", self.label).into_bytes(),
                content_type: "audio/wav".to_string(),
            })
        }
    }
}

pub fn voice(id: &str, language: &str) -> VoiceEntry {
    VoiceEntry {
        id: id.to_string(),
        language: Some(language.to_string()),
        region: None,
        gender: None,
    }
}

/// Hub wired entirely from mocks; `None` slots stay unconfigured.
pub fn hub_with(
    deepl: Option<Arc<MockTranslationRepository>>,
    libretranslate: Option<Arc<MockTranslationRepository>>,
    kokoro: Option<Arc<MockSpeechRepository>>,
    piper: Option<Arc<MockSpeechRepository>>,
) -> ProviderHub {
    ProviderHub::new(
        deepl.map(|r| r as Arc<dyn TranslationRepository>),
        libretranslate.map(|r| r as Arc<dyn TranslationRepository>),
        kokoro.map(|r| r as Arc<dyn SpeechRepository>),
        piper.map(|r| r as Arc<dyn SpeechRepository>),
        test_settings(),
    )
}
