use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::translation_repository::TranslationRepository;
use crate::domain::translation::{LanguageDetection, SupportedLanguage};

/// LibreTranslate implementation of the translation repository. The
/// self-hosted engine: always the fallback, and the only one with a
/// language-detection endpoint.
pub struct LibreTranslateRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct Detection {
    confidence: f32,
    language: String,
}

/// The detect endpoint returns an array of candidates; older deployments
/// return a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectResponse {
    Many(Vec<Detection>),
    One(Detection),
}

#[derive(Debug, Deserialize)]
struct LanguageItem {
    code: String,
    name: String,
}

impl LibreTranslateRepository {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TranslationRepository for LibreTranslateRepository {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, String> {
        let request = TranslateRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
        };

        tracing::info!(
            target = target_lang,
            source = source_lang.unwrap_or("auto"),
            text_length = text.len(),
            "calling LibreTranslate translate"
        );

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("LibreTranslate request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "LibreTranslate translation failed: {}",
                response.status()
            ));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse LibreTranslate response: {e}"))?;

        Ok(parsed.translated_text)
    }

    async fn detect(&self, text: &str) -> Result<LanguageDetection, String> {
        let response = self
            .client
            .post(format!("{}/detect", self.base_url))
            .json(&DetectRequest { q: text })
            .send()
            .await
            .map_err(|e| format!("language detection request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("language detection failed: {}", response.status()));
        }

        let parsed: DetectResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse detection response: {e}"))?;

        let detection = match parsed {
            DetectResponse::Many(candidates) => candidates
                .into_iter()
                .next()
                .ok_or_else(|| "language detection returned no candidates".to_string())?,
            DetectResponse::One(detection) => detection,
        };

        Ok(LanguageDetection {
            language: detection.language,
            confidence: detection.confidence,
        })
    }

    async fn languages(&self) -> Result<Vec<SupportedLanguage>, String> {
        let response = self
            .client
            .get(format!("{}/languages", self.base_url))
            .send()
            .await
            .map_err(|e| format!("failed to fetch languages: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("failed to fetch languages: {}", response.status()));
        }

        let items: Vec<LanguageItem> = response
            .json()
            .await
            .map_err(|e| format!("failed to parse languages response: {e}"))?;

        Ok(items
            .into_iter()
            .map(|l| SupportedLanguage {
                code: l.code,
                name: l.name,
            })
            .collect())
    }

    /// The languages listing doubles as the health probe; it needs no
    /// credentials and touches no translation models.
    async fn health_check(&self) -> Result<(), String> {
        let response = self
            .client
            .get(format!("{}/languages", self.base_url))
            .send()
            .await
            .map_err(|e| format!("LibreTranslate health check failed: {e}"))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!(
                "LibreTranslate health check failed: {}",
                response.status()
            ))
        }
    }
}
