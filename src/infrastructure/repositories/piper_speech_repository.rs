use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::speech_repository::{AudioData, SpeechRepository};
use crate::domain::speech::{SynthesisOptions, VoiceCatalog, VoiceEntry};

const DEFAULT_NOISE_SCALE: f32 = 0.667;
const DEFAULT_LENGTH_SCALE: f32 = 1.0;
const DEFAULT_NOISE_W: f32 = 0.8;

/// Piper implementation of the speech repository. Self-hosted engine with a
/// wide per-language voice catalog; always answers WAV.
pub struct PiperSpeechRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PiperVoice {
    language: PiperLanguage,
}

#[derive(Debug, Deserialize)]
struct PiperLanguage {
    code: String,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
    noise_scale: f32,
    length_scale: f32,
    noise_w: f32,
}

impl PiperSpeechRepository {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpeechRepository for PiperSpeechRepository {
    async fn list_voices(&self) -> Result<VoiceCatalog, String> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .send()
            .await
            .map_err(|e| format!("failed to fetch Piper voices: {e}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "failed to fetch Piper voices: {}",
                response.status()
            ));
        }

        // The listing is a JSON object keyed by voice id; document order is
        // the catalog's insertion order.
        let voices: serde_json::Map<String, serde_json::Value> = response
            .json()
            .await
            .map_err(|e| format!("failed to parse Piper voices: {e}"))?;

        let entries = voices
            .into_iter()
            .map(|(id, value)| match serde_json::from_value::<PiperVoice>(value) {
                Ok(voice) => VoiceEntry {
                    id,
                    language: Some(voice.language.code),
                    region: voice.language.region,
                    gender: None,
                },
                Err(_) => VoiceEntry {
                    id,
                    language: None,
                    region: None,
                    gender: None,
                },
            })
            .collect();

        Ok(VoiceCatalog::new(entries))
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        options: &SynthesisOptions,
    ) -> Result<AudioData, String> {
        if text.trim().is_empty() {
            return Err("text is required for speech synthesis".to_string());
        }

        let request = SynthesisRequest {
            text: text.trim(),
            voice,
            noise_scale: options.noise_scale.unwrap_or(DEFAULT_NOISE_SCALE),
            length_scale: options.length_scale.unwrap_or(DEFAULT_LENGTH_SCALE),
            noise_w: options.noise_w.unwrap_or(DEFAULT_NOISE_W),
        };

        tracing::info!(
            voice = request.voice,
            text_length = request.text.len(),
            "calling Piper synthesis"
        );

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Piper synthesis failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Piper synthesis failed");
            return Err(format!("Piper synthesis failed: {status}"));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read Piper audio stream: {e}"))?;

        Ok(AudioData {
            bytes: bytes.to_vec(),
            content_type: "audio/wav".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_listing_preserves_document_order() {
        let json = r#"{
            "de_DE-thorsten-high": {"language": {"code": "de_DE", "region": "Germany"}},
            "en_US-amy-medium": {"language": {"code": "en_US", "region": "United States"}},
            "fr_FR-siwis-low": {"language": {"code": "fr_FR"}}
        }"#;

        let voices: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = voices.keys().map(String::as_str).collect();
        assert_eq!(
            ids,
            vec!["de_DE-thorsten-high", "en_US-amy-medium", "fr_FR-siwis-low"]
        );

        let first: PiperVoice =
            serde_json::from_value(voices["de_DE-thorsten-high"].clone()).unwrap();
        assert_eq!(first.language.code, "de_DE");
        assert_eq!(first.language.region.as_deref(), Some("Germany"));
    }

    #[test]
    fn malformed_entries_still_occupy_their_catalog_slot() {
        let value = serde_json::json!({"unexpected": true});
        assert!(serde_json::from_value::<PiperVoice>(value).is_err());
    }
}
