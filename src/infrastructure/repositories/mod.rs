pub mod deepl_translation_repository;
pub mod kokoro_speech_repository;
pub mod libretranslate_repository;
pub mod piper_speech_repository;
pub mod speech_repository;
pub mod translation_repository;

pub use deepl_translation_repository::DeepLTranslationRepository;
pub use kokoro_speech_repository::KokoroSpeechRepository;
pub use libretranslate_repository::LibreTranslateRepository;
pub use piper_speech_repository::PiperSpeechRepository;
pub use speech_repository::{AudioData, SpeechRepository};
pub use translation_repository::TranslationRepository;
