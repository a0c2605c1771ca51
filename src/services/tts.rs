//! Google Cloud Text-to-Speech adapter.

use std::env;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::error::ServiceError;
use super::{SpeechSynthesizer, VoiceOptions};
use crate::constants;

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

#[derive(Clone)]
pub struct TtsClient {
    api_key: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

impl TtsClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GOOGLE_TTS_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .unwrap_or_default();
        if api_key.is_empty() {
            warn!("TTS API key not found; speech synthesis will fail");
        }
        Self::new(&api_key)
    }
}

/// Strip formatting and expand abbreviations the voices mispronounce.
fn clean_script_for_tts(script: &str) -> String {
    let mut text = script.replace(['*', '_', '`'], "");

    for (abbr, expansion) in [
        ("AI", "Artificial Intelligence"),
        ("API", "Application Programming Interface"),
        ("CEO", "Chief Executive Officer"),
        ("CTO", "Chief Technology Officer"),
        ("VR", "Virtual Reality"),
        ("AR", "Augmented Reality"),
        ("IOT", "Internet of Things"),
        ("NASA", "National Aeronautics and Space Administration"),
    ] {
        text = replace_word(&text, abbr, expansion);
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word replacement (neighbors must be non-alphanumeric).
fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while let Some(pos) = text[i..].find(word) {
        let start = i + pos;
        let end = start + word.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end == text.len() || !bytes[end].is_ascii_alphanumeric();
        out.push_str(&text[i..start]);
        if before_ok && after_ok {
            out.push_str(replacement);
        } else {
            out.push_str(word);
        }
        i = end;
    }
    out.push_str(&text[i..]);
    out
}

#[async_trait]
impl SpeechSynthesizer for TtsClient {
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<PathBuf, ServiceError> {
        let body = json!({
            "input": { "text": text },
            "voice": {
                "languageCode": options.language_code,
                "name": options.voice,
                "ssmlGender": options.gender,
            },
            "audioConfig": {
                "audioEncoding": "MP3",
                "speakingRate": options.speaking_rate,
                "pitch": options.pitch,
                "volumeGainDb": 0.0,
                "sampleRateHertz": 24000,
            },
        });

        let resp = self
            .http
            .post(SYNTHESIZE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!("TTS API error: {}", text)));
        }

        let parsed: SynthesizeResponse = resp.json().await?;
        let encoded = parsed.audio_content.ok_or_else(|| {
            ServiceError::Api("No audio content received from TTS service".to_string())
        })?;
        let audio = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ServiceError::Processing(format!("Failed to decode TTS audio: {}", e)))?;

        let dir = constants::temp_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let output_path = dir.join(format!("autotube_tts_{}.mp3", rand::random::<u64>()));
        tokio::fs::write(&output_path, &audio).await?;

        Ok(output_path)
    }

    async fn synthesize_script(&self, script: &str) -> Result<PathBuf, ServiceError> {
        let cleaned = clean_script_for_tts(script);
        // Male Indian voice, slightly slower and lower for news reading
        let options = VoiceOptions {
            voice: "en-IN-Standard-D".to_string(),
            language_code: "en-IN".to_string(),
            gender: "MALE".to_string(),
            speaking_rate: 0.9,
            pitch: -2.0,
        };
        self.synthesize(&cleaned, &options).await
    }

    async fn check_health(&self) -> bool {
        let path = match self.synthesize("Health check test", &VoiceOptions::default()).await {
            Ok(path) => path,
            Err(_) => return false,
        };

        let ok = tokio::fs::metadata(&path)
            .await
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        let _ = tokio::fs::remove_file(&path).await;
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_markdown_and_whitespace() {
        let cleaned = clean_script_for_tts("Hello  *world*,\n\nthis is `a`   _test_.");
        assert_eq!(cleaned, "Hello world, this is a test.");
    }

    #[test]
    fn expands_abbreviations_on_word_boundaries() {
        assert_eq!(
            clean_script_for_tts("AI is everywhere"),
            "Artificial Intelligence is everywhere"
        );
        assert_eq!(
            clean_script_for_tts("NASA launched a probe."),
            "National Aeronautics and Space Administration launched a probe."
        );
        // Substrings of larger words are left alone
        assert_eq!(clean_script_for_tts("SAID and MAID"), "SAID and MAID");
        assert_eq!(clean_script_for_tts("RETAIL"), "RETAIL");
    }
}
