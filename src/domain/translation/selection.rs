use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::{TranslationError, TranslationProvider};
use crate::domain::shared::SelectionCache;
use crate::infrastructure::repositories::TranslationRepository;

/// Tunables for provider selection. The initial window is deliberately
/// shorter than the steady-state one: an optimistic cold-start choice only
/// has to survive until the deferred health check corrects it.
#[derive(Debug, Clone, Copy)]
pub struct SelectionSettings {
    pub steady_ttl: Duration,
    pub initial_ttl: Duration,
    pub recheck_delay: Duration,
    pub health_timeout: Duration,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            steady_ttl: Duration::from_secs(60 * 60),
            initial_ttl: Duration::from_secs(10 * 60),
            recheck_delay: Duration::from_secs(5),
            health_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderHealth {
    pub configured: bool,
    pub healthy: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationHealth {
    pub deepl: ProviderHealth,
    pub libretranslate: ProviderHealth,
    /// Whether language detection is usable (it is pinned to the
    /// self-hosted engine).
    pub detection_available: bool,
    pub active: Option<TranslationProvider>,
}

/// Decides which translation backend serves requests and owns the selection
/// cache for the translation family. Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct TranslationSelector {
    inner: Arc<SelectorInner>,
}

struct SelectorInner {
    deepl: Option<Arc<dyn TranslationRepository>>,
    libretranslate: Option<Arc<dyn TranslationRepository>>,
    cache: SelectionCache<TranslationProvider>,
    settings: SelectionSettings,
    recheck_scheduled: AtomicBool,
}

impl TranslationSelector {
    pub fn new(
        deepl: Option<Arc<dyn TranslationRepository>>,
        libretranslate: Option<Arc<dyn TranslationRepository>>,
        settings: SelectionSettings,
    ) -> Self {
        Self {
            inner: Arc::new(SelectorInner {
                deepl,
                libretranslate,
                cache: SelectionCache::new(),
                settings,
                recheck_scheduled: AtomicBool::new(false),
            }),
        }
    }

    pub fn repository(
        &self,
        provider: TranslationProvider,
    ) -> Option<Arc<dyn TranslationRepository>> {
        self.inner.repository(provider)
    }

    /// The next configured provider below `provider`, if any.
    pub fn fallback_for(&self, provider: TranslationProvider) -> Option<TranslationProvider> {
        let ladder = self.inner.priority();
        ladder
            .iter()
            .skip_while(|p| **p != provider)
            .nth(1)
            .copied()
    }

    /// The engine that serves language detection. The paid engine has no
    /// detection endpoint, so this is always the self-hosted one.
    pub fn detector(&self) -> Option<Arc<dyn TranslationRepository>> {
        self.inner.libretranslate.clone()
    }

    /// Resolve the active provider for this request.
    ///
    /// Fast path is a cache read. A cold cache selects optimistically
    /// (no network on the request path) and defers confirmation to a
    /// background health pass; an expired cache revalidates with
    /// single-flight semantics, handing concurrent callers the previous
    /// value instead of a second health pass.
    pub async fn select(&self) -> Result<TranslationProvider, TranslationError> {
        let inner = &self.inner;
        let ladder = inner.priority();
        let Some(&first) = ladder.first() else {
            return Err(TranslationError::NotConfigured);
        };

        if let Some(provider) = inner.cache.fresh() {
            return Ok(provider);
        }

        if inner.cache.is_cold() {
            if first == TranslationProvider::DeepL {
                // Trust the paid engine without a synchronous health check to
                // keep cold-start latency flat; the deferred pass corrects
                // the cache if that optimism was wrong.
                inner.cache.prime(first, inner.settings.initial_ttl);
                self.schedule_recheck();
                tracing::info!(
                    provider = %first,
                    "initial provider selection without health check"
                );
                return Ok(first);
            }
            // A single configured backend leaves nothing to compare.
            inner.cache.store(first, inner.settings.steady_ttl);
            tracing::info!(provider = %first, "selected sole configured translation provider");
            return Ok(first);
        }

        let chosen = inner
            .cache
            .revalidate_with(inner.settings.steady_ttl, || inner.health_pass())
            .await;
        Ok(chosen)
    }

    /// Overwrite the cached selection after a fallback recovery, so
    /// subsequent calls skip the provider that just failed until the cache
    /// naturally expires.
    pub fn record_fallback(&self, provider: TranslationProvider) {
        self.inner.cache.store(provider, self.inner.settings.steady_ttl);
        tracing::info!(provider = %provider, "selection cache updated after fallback recovery");
    }

    /// Drop the cached selection, forcing a fresh pick on next use.
    pub fn clear(&self) {
        self.inner.cache.clear();
        self.inner.recheck_scheduled.store(false, Ordering::SeqCst);
    }

    /// Spawn the one deferred health pass that confirms (or corrects) an
    /// optimistic cold-start selection. Detached from the triggering
    /// request; later requests observe the outcome through the cache.
    fn schedule_recheck(&self) {
        if self.inner.recheck_scheduled.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.settings.recheck_delay).await;
            inner.confirm_initial_selection().await;
        });
    }

    /// Live diagnostics for the translation family.
    pub async fn health_report(&self) -> TranslationHealth {
        let inner = &self.inner;
        let deepl_configured = inner.deepl.is_some();
        let libre_configured = inner.libretranslate.is_some();

        let deepl_healthy = if deepl_configured {
            inner.probe(TranslationProvider::DeepL).await
        } else {
            false
        };
        let libre_healthy = if libre_configured {
            inner.probe(TranslationProvider::LibreTranslate).await
        } else {
            false
        };

        TranslationHealth {
            deepl: ProviderHealth {
                configured: deepl_configured,
                healthy: deepl_healthy,
            },
            libretranslate: ProviderHealth {
                configured: libre_configured,
                healthy: libre_healthy,
            },
            detection_available: libre_configured && libre_healthy,
            active: inner.cache.last_known(),
        }
    }
}

impl SelectorInner {
    /// Configured providers in descending priority order.
    fn priority(&self) -> Vec<TranslationProvider> {
        let mut ladder = Vec::with_capacity(2);
        if self.deepl.is_some() {
            ladder.push(TranslationProvider::DeepL);
        }
        if self.libretranslate.is_some() {
            ladder.push(TranslationProvider::LibreTranslate);
        }
        ladder
    }

    fn repository(
        &self,
        provider: TranslationProvider,
    ) -> Option<Arc<dyn TranslationRepository>> {
        match provider {
            TranslationProvider::DeepL => self.deepl.clone(),
            TranslationProvider::LibreTranslate => self.libretranslate.clone(),
        }
    }

    /// Walk the priority ladder and pick the first healthy provider, or the
    /// lowest-priority one unconditionally when none report healthy. Never
    /// answers "no provider" once at least one backend is configured.
    async fn health_pass(&self) -> TranslationProvider {
        let ladder = self.priority();
        for &provider in &ladder {
            if self.probe(provider).await {
                tracing::info!(provider = %provider, "health check passed, provider selected");
                return provider;
            }
        }

        let last = *ladder
            .last()
            .expect("health pass requires a configured provider");
        tracing::warn!(
            provider = %last,
            "no translation provider reported healthy, selecting last resort"
        );
        last
    }

    async fn probe(&self, provider: TranslationProvider) -> bool {
        let Some(repo) = self.repository(provider) else {
            return false;
        };
        match tokio::time::timeout(self.settings.health_timeout, repo.health_check()).await {
            Ok(Ok(())) => true,
            Ok(Err(message)) => {
                tracing::warn!(provider = %provider, error = %message, "health check failed");
                false
            }
            Err(_) => {
                tracing::warn!(
                    provider = %provider,
                    timeout_secs = self.settings.health_timeout.as_secs(),
                    "health check timed out"
                );
                false
            }
        }
    }

    async fn confirm_initial_selection(&self) {
        if self.cache.is_confirmed() {
            return;
        }
        let _guard = self.cache.lock_revalidation().await;
        if self.cache.is_confirmed() {
            return;
        }
        let chosen = self.health_pass().await;
        self.cache.store(chosen, self.settings.steady_ttl);
        tracing::info!(provider = %chosen, "background health check confirmed provider selection");
    }
}
