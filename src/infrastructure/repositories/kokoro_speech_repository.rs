use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::speech_repository::{AudioData, SpeechRepository};
use crate::domain::speech::voice::language_family;
use crate::domain::speech::{SynthesisOptions, VoiceCatalog, VoiceEntry};

const DEFAULT_MODEL: &str = "kokoro";
const DEFAULT_VOICE: &str = "af_heart";
const DEFAULT_FORMAT: &str = "wav";

/// Kokoro voice ids encode language and gender in a two-letter prefix
/// (`af_heart` = American English female). The catalog is rebuilt from this
/// table so the shared matching cascade can work on real language tags.
const VOICE_PREFIXES: &[(&str, &str)] = &[
    ("af_", "en_US"),
    ("am_", "en_US"),
    ("bf_", "en_GB"),
    ("bm_", "en_GB"),
    ("zf_", "zh_CN"),
    ("zm_", "zh_CN"),
    ("jf_", "ja_JP"),
    ("jm_", "ja_JP"),
    ("hf_", "hi_IN"),
    ("hm_", "hi_IN"),
    ("ef_", "es_ES"),
    ("em_", "es_ES"),
    ("pf_", "pt_BR"),
    ("pm_", "pt_BR"),
    ("ff_", "fr_FR"),
    ("if_", "it_IT"),
    ("im_", "it_IT"),
];

/// Kokoro implementation of the speech repository, over its
/// OpenAI-compatible HTTP API.
pub struct KokoroSpeechRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    speed: f32,
    volume_multiplier: f32,
}

fn classify_voice(id: &str) -> (Option<&'static str>, Option<&'static str>) {
    let language = VOICE_PREFIXES
        .iter()
        .find(|(prefix, _)| id.starts_with(prefix))
        .map(|(_, language)| *language);
    let gender = match (language, id.as_bytes().get(1)) {
        (Some(_), Some(b'f')) => Some("female"),
        (Some(_), Some(b'm')) => Some("male"),
        _ => None,
    };
    (language, gender)
}

impl KokoroSpeechRepository {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpeechRepository for KokoroSpeechRepository {
    async fn list_voices(&self) -> Result<VoiceCatalog, String> {
        let response = self
            .client
            .get(format!("{}/v1/audio/voices", self.base_url))
            .send()
            .await
            .map_err(|e| format!("failed to fetch Kokoro voices: {e}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "failed to fetch Kokoro voices: {}",
                response.status()
            ));
        }

        let parsed: VoicesResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse Kokoro voices: {e}"))?;

        let entries = parsed
            .voices
            .into_iter()
            .map(|id| {
                let (language, gender) = classify_voice(&id);
                let region = language
                    .and_then(|tag| tag.split('_').nth(1))
                    .map(str::to_string);
                VoiceEntry {
                    id,
                    language: language.map(str::to_string),
                    region,
                    gender: gender.map(str::to_string),
                }
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

        let request = SpeechRequest {
            model: options.model.as_deref().unwrap_or(DEFAULT_MODEL),
            input: text.trim(),
            voice: if voice.is_empty() { DEFAULT_VOICE } else { voice },
            response_format: options.response_format.as_deref().unwrap_or(DEFAULT_FORMAT),
            speed: options.speed.unwrap_or(1.0),
            volume_multiplier: options.volume_multiplier.unwrap_or(1.0),
        };

        tracing::info!(
            voice = request.voice,
            model = request.model,
            format = request.response_format,
            text_length = request.input.len(),
            "calling Kokoro synthesis"
        );

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Kokoro synthesis failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Kokoro synthesis failed");
            return Err(format!("Kokoro synthesis failed: {status}"));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/wav")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read Kokoro audio stream: {e}"))?;

        Ok(AudioData {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// Korean has no dedicated Kokoro voices; Japanese ones are the closest
    /// approximation the engine offers.
    fn normalize_language(&self, tag: &str) -> String {
        match language_family(tag) {
            "ko" => "ja".to_string(),
            _ => tag.to_string(),
        }
    }
}
