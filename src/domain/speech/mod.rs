pub mod error;
pub mod service;
pub mod voice;

pub use error::SpeechError;
pub use service::{EngineStatus, SpeechService};
pub use voice::{VoiceCatalog, VoiceEntry};

use serde::{Deserialize, Serialize};

/// The two configured speech-synthesis engines. Neither has a fixed
/// priority: which one is tried first depends on the requested language
/// (see [`voice::prefers_kokoro`]) or an explicit per-request override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngine {
    Kokoro,
    Piper,
}

impl SpeechEngine {
    pub fn other(self) -> SpeechEngine {
        match self {
            SpeechEngine::Kokoro => SpeechEngine::Piper,
            SpeechEngine::Piper => SpeechEngine::Kokoro,
        }
    }
}

impl std::fmt::Display for SpeechEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SpeechEngine::Kokoro => "kokoro",
            SpeechEngine::Piper => "piper",
        };
        write!(f, "{name}")
    }
}

/// Per-request synthesis knobs. Everything is optional; engines apply their
/// own defaults for whatever is absent.
#[derive(Debug, Clone, Default)]
pub struct SynthesisOptions {
    /// Force a specific engine, overriding language affinity.
    pub engine: Option<SpeechEngine>,
    /// Force a specific voice, skipping catalog matching.
    pub voice: Option<String>,
    pub model: Option<String>,
    pub response_format: Option<String>,
    pub speed: Option<f32>,
    pub volume_multiplier: Option<f32>,
    pub noise_scale: Option<f32>,
    pub length_scale: Option<f32>,
    pub noise_w: Option<f32>,
}

/// Synthesized audio plus the engine and voice that produced it.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub audio: Vec<u8>,
    pub content_type: String,
    pub content_length: usize,
    pub engine: SpeechEngine,
    pub voice: String,
}
