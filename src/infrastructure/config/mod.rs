use std::env;

use anyhow::Context;

/// Process configuration for the provider core. A provider is "configured"
/// when its credential or URL is present and non-empty; adapters are only
/// constructed for configured providers.
#[derive(Debug, Clone)]
pub struct Config {
    pub deepl_api_key: Option<String>,
    pub libretranslate_url: Option<String>,
    pub kokoro_url: Option<String>,
    pub piper_url: Option<String>,
    /// Steady-state validity window for a provider selection, seconds.
    pub provider_cache_ttl_secs: u64,
    /// Shorter window for the optimistic cold-start selection, seconds.
    pub provider_cache_initial_ttl_secs: u64,
    /// Delay before the background health check that confirms a cold-start
    /// selection, seconds.
    pub provider_recheck_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub health_check_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            deepl_api_key: optional_env("DEEPL_API_KEY"),
            libretranslate_url: optional_env("LIBRETRANSLATE_API"),
            kokoro_url: optional_env("KOKORO_API"),
            piper_url: optional_env("PIPER_API"),
            provider_cache_ttl_secs: parsed_env("PROVIDER_CACHE_TTL_SECS", 60 * 60)?,
            provider_cache_initial_ttl_secs: parsed_env("PROVIDER_CACHE_INITIAL_TTL_SECS", 10 * 60)?,
            provider_recheck_delay_secs: parsed_env("PROVIDER_RECHECK_DELAY_SECS", 5)?,
            request_timeout_secs: parsed_env("PROVIDER_REQUEST_TIMEOUT_SECS", 30)?,
            health_check_timeout_secs: parsed_env("PROVIDER_HEALTH_TIMEOUT_SECS", 5)?,
        })
    }

    pub fn translation_configured(&self) -> bool {
        self.deepl_api_key.is_some() || self.libretranslate_url.is_some()
    }

    pub fn speech_configured(&self) -> bool {
        self.kokoro_url.is_some() || self.piper_url.is_some()
    }
}

/// An empty or whitespace-only variable counts as unconfigured.
fn optional_env(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn parsed_env(name: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("{name} must be an integer, got {value:?}")),
        Err(_) => Ok(default),
    }
}
