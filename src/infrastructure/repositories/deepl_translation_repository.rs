use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::translation_repository::TranslationRepository;

const DEEPL_API_URL: &str = "https://api.deepl.com";
const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com";

/// DeepL implementation of the translation repository. The paid engine:
/// highest translation quality, no language detection endpoint.
pub struct DeepLTranslationRepository {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    text: String,
}

impl DeepLTranslationRepository {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        // Free-tier keys are suffixed ":fx" and live on a separate host.
        let base_url = if api_key.ends_with(":fx") {
            DEEPL_FREE_API_URL
        } else {
            DEEPL_API_URL
        };
        Self {
            client,
            api_key,
            base_url: base_url.to_string(),
        }
    }

    /// Map a `language[_REGION]` tag to a DeepL target code. DeepL wants
    /// upper-cased codes and rejects bare `EN`/`PT` as targets.
    fn map_target_lang(tag: &str) -> String {
        let code = tag.replace('_', "-").to_uppercase();
        match code.as_str() {
            "EN" => "EN-US".to_string(),
            "PT" => "PT-PT".to_string(),
            c if c.starts_with("ZH") => "ZH".to_string(),
            _ => code,
        }
    }

    /// Source codes take the bare language family only.
    fn map_source_lang(tag: &str) -> String {
        tag.split('_').next().unwrap_or(tag).to_uppercase()
    }
}

#[async_trait]
impl TranslationRepository for DeepLTranslationRepository {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, String> {
        let request = TranslateRequest {
            text: vec![text],
            target_lang: Self::map_target_lang(target_lang),
            source_lang: source_lang.map(Self::map_source_lang),
        };

        tracing::info!(
            target = %request.target_lang,
            source = request.source_lang.as_deref().unwrap_or("auto"),
            text_length = text.len(),
            "calling DeepL translate"
        );

        let response = self
            .client
            .post(format!("{}/v2/translate", self.base_url))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("DeepL request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "DeepL translation failed");
            return Err(format!("DeepL translation failed: {status}"));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse DeepL response: {e}"))?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| "DeepL returned no translations".to_string())
    }

    /// Usage lookup is the cheapest authenticated call DeepL offers; it
    /// validates the key without consuming translation quota.
    async fn health_check(&self) -> Result<(), String> {
        let response = self
            .client
            .get(format!("{}/v2/usage", self.base_url))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .send()
            .await
            .map_err(|e| format!("DeepL health check failed: {e}"))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("DeepL health check failed: {}", response.status()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_codes_follow_deepl_requirements() {
        assert_eq!(DeepLTranslationRepository::map_target_lang("en"), "EN-US");
        assert_eq!(DeepLTranslationRepository::map_target_lang("en_GB"), "EN-GB");
        assert_eq!(DeepLTranslationRepository::map_target_lang("pt"), "PT-PT");
        assert_eq!(DeepLTranslationRepository::map_target_lang("pt_BR"), "PT-BR");
        assert_eq!(DeepLTranslationRepository::map_target_lang("zh_CN"), "ZH");
        assert_eq!(DeepLTranslationRepository::map_target_lang("de"), "DE");
    }

    #[test]
    fn source_codes_are_bare_families() {
        assert_eq!(DeepLTranslationRepository::map_source_lang("en_US"), "EN");
        assert_eq!(DeepLTranslationRepository::map_source_lang("es"), "ES");
    }

    #[test]
    fn free_tier_keys_use_the_free_host() {
        let repo = DeepLTranslationRepository::new(
            reqwest::Client::new(),
            "secret-key:fx".to_string(),
        );
        assert_eq!(repo.base_url, DEEPL_FREE_API_URL);

        let repo =
            DeepLTranslationRepository::new(reqwest::Client::new(), "secret-key".to_string());
        assert_eq!(repo.base_url, DEEPL_API_URL);
    }
}
